pub mod email;
pub mod identity;
pub mod images;
pub mod qr;
pub mod storage;
