//! Tera templates compiled into the binary.

use anyhow::{Context as _, Result};
use rust_embed::RustEmbed;
use tera::{Context, Tera};

#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateFiles;

/// The parsed template set. Built once at startup and shared.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Parse every embedded template.
    ///
    /// # Errors
    /// Returns an error if a template is not UTF-8 or fails to parse.
    pub fn load() -> Result<Self> {
        let sources = TemplateFiles::iter()
            .map(|name| {
                let file = TemplateFiles::get(&name)
                    .with_context(|| format!("embedded template '{name}' vanished"))?;
                let text = String::from_utf8(file.data.into_owned())
                    .with_context(|| format!("template '{name}' is not UTF-8"))?;
                Ok((name.into_owned(), text))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut tera = Tera::default();
        tera.set_escape_fn(escape_html);
        tera.add_raw_templates(sources)
            .context("failed to parse templates")?;
        tracing::debug!(count = tera.get_template_names().count(), "templates loaded");
        Ok(Self { tera })
    }

    /// Render `name`. Templates ending in `.html` are autoescaped.
    ///
    /// # Errors
    /// Returns the Tera error if the template is unknown or rendering fails.
    pub fn render(&self, name: &str, ctx: &Context) -> Result<String, tera::Error> {
        self.tera.render(name, ctx)
    }
}

/// HTML escaping for text and attribute values. Unlike Tera's default it
/// leaves `/` alone so URLs stay readable in the markup.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
