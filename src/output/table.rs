//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct ContextRow {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "CREATED AT")]
        created_at: String,
    }

    #[test]
    fn test_format_table_empty() {
        let items: Vec<ContextRow> = vec![];
        let result = format_table(&items);
        assert_eq!(result, "No results found.");
    }

    #[test]
    fn test_format_table_renders_headers_and_rows() {
        let items = vec![
            ContextRow {
                name: "deploy".to_string(),
                created_at: "2024-01-15T09:30:00Z".to_string(),
            },
            ContextRow {
                name: "staging".to_string(),
                created_at: "2024-02-20T18:00:00Z".to_string(),
            },
        ];

        let result = format_table(&items);

        assert!(result.contains("NAME"));
        assert!(result.contains("CREATED AT"));
        assert!(result.contains("deploy"));
        assert!(result.contains("staging"));
    }
}
