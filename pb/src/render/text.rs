//! Terminal listing for the CLI

use colored::*;
use promptstore::PromptRecord;

use super::Renderer;

/// Plain-text cards, one block per record, numbered by position
pub fn render_text(renderer: &Renderer, records: &[&PromptRecord]) -> String {
    let mut out = String::new();
    for (position, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            format!("#{}", position).bold(),
            format!("[{}]", record.school_type).cyan(),
            format!("[{}]", record.subject).magenta(),
            renderer.format_date(record).dimmed(),
            record.id.yellow(),
        ));
        out.push_str(&format!("{}\n", record.title.bold()));
        for line in record.content.lines() {
            out.push_str(&format!("  {}\n", line));
        }
        if let Some(description) = record.description_text() {
            out.push_str(&format!("  {}\n", description.italic()));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_lists_content_lines() {
        let record = PromptRecord {
            id: "local-9".to_string(),
            title: "Haiku".to_string(),
            school_type: "小学校".to_string(),
            subject: "国語".to_string(),
            content: "line1\nline2".to_string(),
            description: Some("seasonal words".to_string()),
            created_at: None,
        };
        let out = render_text(&Renderer::new().unwrap(), &[&record]);
        assert!(out.contains("Haiku"));
        assert!(out.contains("  line1\n  line2\n"));
        assert!(out.contains("seasonal words"));
        assert!(out.contains("local-9"));
        assert!(out.contains("#0"));
    }

    #[test]
    fn test_render_text_empty() {
        assert!(render_text(&Renderer::new().unwrap(), &[]).is_empty());
    }
}
