use crate::prelude::{eprintln, println, *};
use hadith_core::cleanup;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// Generic body (Arabic text, intros and endings)
    Text,
    /// English body, wrapped in a paragraph
    EnText,
    /// Generic chapter title, outer paragraph removed
    ChapterTitle,
    /// English chapter title
    EnChapterTitle,
}

impl Variant {
    pub fn apply(self, text: &str) -> String {
        match self {
            Variant::Text => cleanup::clean_text(text),
            Variant::EnText => cleanup::clean_en_text(text),
            Variant::ChapterTitle => cleanup::clean_chapter_title(text),
            Variant::EnChapterTitle => cleanup::clean_en_chapter_title(text),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(name = "clean")]
#[command(about = "Clean stored text the same way the API does")]
pub struct App {
    /// Cleanup variant to apply
    #[arg(short, long, value_enum, default_value = "text")]
    pub variant: Variant,

    /// Read from this file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let input = match &app.file {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("Failed to read stdin")?;
            buffer
        }
    };

    if global.verbose {
        eprintln!("Cleaning {} bytes as {:?}", input.len(), app.variant);
    }

    println!("{}", app.variant.apply(&input));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_variant_names() {
        let app = App::parse_from(["clean", "--variant", "en-chapter-title"]);
        assert_eq!(app.variant, Variant::EnChapterTitle);
        assert_eq!(app.file, None);

        let app = App::parse_from(["clean"]);
        assert_eq!(app.variant, Variant::Text);
    }

    #[test]
    fn test_app_parses_file() {
        let app = App::parse_from(["clean", "-v", "chapter-title", "--file", "input.html"]);
        assert_eq!(app.variant, Variant::ChapterTitle);
        assert_eq!(app.file, Some(PathBuf::from("input.html")));
    }

    #[test]
    fn test_variant_dispatch() {
        assert_eq!(Variant::Text.apply("a  b"), "a b");
        assert_eq!(Variant::EnText.apply("body"), "<p>body</p>");
        assert_eq!(Variant::ChapterTitle.apply("<p>Title</p>"), "Title");
        assert_eq!(
            Variant::EnChapterTitle.apply("<p>The Holy Prophet said</p>"),
            "The Prophet (\u{FDFA}) said"
        );
    }

    #[test]
    fn test_run_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "<p>Title</p>").unwrap();

        let app = App {
            variant: Variant::ChapterTitle,
            file: Some(path),
        };
        let global = crate::Global {
            database: "unused.db".to_string(),
            verbose: false,
        };
        assert!(run(app, global).is_ok());
    }
}
