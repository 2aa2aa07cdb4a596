use std::collections::HashMap;

use fardaria_core::{ParsedRow, PortfolioRecord};

use crate::TransferError;

/// The only column an import file must carry.
pub const REQUIRED_HEADER: &str = "titulo";

/// Parse the raw text of an uploaded CSV file into one `ParsedRow` per
/// non-empty data line, in file order.
///
/// Headers are matched by lower-cased name, not position; unrecognized
/// columns are ignored. Structural problems (no data, missing `titulo`
/// column) fail the whole parse; a row-level problem (blank title) is
/// recorded on the row itself and never aborts the other rows.
pub fn parse_csv(content: &str) -> Result<Vec<ParsedRow>, TransferError> {
    let lines: Vec<&str> = content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.len() < 2 {
        return Err(TransferError::TooFewLines);
    }

    // Header row is split on plain commas. Duplicate headers: last one wins.
    let mut headers: HashMap<String, usize> = HashMap::new();
    for (index, name) in lines[0].split(',').enumerate() {
        headers.insert(name.trim().to_lowercase(), index);
    }
    if !headers.contains_key(REQUIRED_HEADER) {
        return Err(TransferError::MissingColumn(REQUIRED_HEADER.to_string()));
    }

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        let values = tokenize_line(line);
        let field = |name: &str| -> Option<String> {
            headers
                .get(name)
                .and_then(|&i| values.get(i))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let record = PortfolioRecord {
            title: field("titulo").unwrap_or_default(),
            description: field("descricao"),
            client: field("cliente"),
            category: field("categoria"),
            image_url: field("imagem_url"),
            project_link: field("link_projeto"),
            project_date: field("data_projeto"),
            order: field("ordem")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(0),
            visible: field("visivel").map_or(true, |v| v.to_lowercase() != "false"),
        };
        rows.push(ParsedRow::new(record));
    }

    Ok(rows)
}

/// Split one CSV line into fields, honoring double-quote wrapping.
///
/// Single left-to-right scan: `""` inside a quoted field is a literal quote,
/// commas inside quotes do not split, and an unterminated quote is implicitly
/// closed at end of line rather than rejected.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use fardaria_core::TITLE_REQUIRED;

    // ── tokenize_line ─────────────────────────────────────────────────────────

    #[test]
    fn tokenize_plain_fields() {
        assert_eq!(tokenize_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn tokenize_quoted_commas_and_escaped_quotes() {
        assert_eq!(
            tokenize_line(r#"a,"b,c","d""e",f"#),
            vec!["a", "b,c", "d\"e", "f"]
        );
    }

    #[test]
    fn tokenize_empty_fields() {
        assert_eq!(tokenize_line(",,"), vec!["", "", ""]);
    }

    #[test]
    fn tokenize_unterminated_quote_runs_to_end_of_line() {
        // The open quote swallows the rest of the line, commas included.
        assert_eq!(tokenize_line(r#"a,"bc,def"#), vec!["a", "bc,def"]);
    }

    #[test]
    fn tokenize_lone_quoted_empty_field() {
        assert_eq!(tokenize_line(r#""""#), vec![""]);
    }

    // ── parse_csv ─────────────────────────────────────────────────────────────

    #[test]
    fn parse_mixed_valid_and_invalid_rows() {
        let csv = "titulo,ordem,visivel\nCamisa Polo,2,false\n,3,true\nFato Macaco,,";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 3);

        assert!(rows[0].is_valid());
        assert_eq!(rows[0].record.title, "Camisa Polo");
        assert_eq!(rows[0].record.order, 2);
        assert!(!rows[0].record.visible);

        assert_eq!(rows[1].error.as_deref(), Some(TITLE_REQUIRED));
        assert_eq!(rows[1].record.order, 3);
        assert!(rows[1].record.visible);

        assert!(rows[2].is_valid());
        assert_eq!(rows[2].record.title, "Fato Macaco");
        assert_eq!(rows[2].record.order, 0);
        assert!(rows[2].record.visible);
    }

    #[test]
    fn parse_missing_title_column_is_structural() {
        let result = parse_csv("descricao,categoria\nfoo,bar");
        assert!(matches!(
            result,
            Err(TransferError::MissingColumn(c)) if c == "titulo"
        ));
    }

    #[test]
    fn parse_too_few_lines() {
        assert!(matches!(parse_csv(""), Err(TransferError::TooFewLines)));
        assert!(matches!(parse_csv("titulo"), Err(TransferError::TooFewLines)));
        // Blank lines don't count as data.
        assert!(matches!(
            parse_csv("titulo\n\n   \n"),
            Err(TransferError::TooFewLines)
        ));
    }

    #[test]
    fn parse_skips_blank_lines_without_consuming_ordinals() {
        let rows = parse_csv("titulo\nPrimeiro\n\nSegundo\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record.title, "Primeiro");
        assert_eq!(rows[1].record.title, "Segundo");
    }

    #[test]
    fn parse_headers_case_insensitive_and_reordered() {
        let rows = parse_csv("Cliente,TITULO\nEDP,Farda Industrial").unwrap();
        assert_eq!(rows[0].record.title, "Farda Industrial");
        assert_eq!(rows[0].record.client.as_deref(), Some("EDP"));
    }

    #[test]
    fn parse_ignores_unrecognized_headers() {
        let rows = parse_csv("titulo,nota_interna\nBata,rascunho").unwrap();
        assert!(rows[0].is_valid());
        assert_eq!(rows[0].record.title, "Bata");
    }

    #[test]
    fn parse_order_defaults_and_signs() {
        let rows = parse_csv("titulo,ordem\na,5\nb,-2\nc,abc\nd,").unwrap();
        let orders: Vec<i64> = rows.iter().map(|r| r.record.order).collect();
        assert_eq!(orders, vec![5, -2, 0, 0]);
    }

    #[test]
    fn parse_visible_only_false_on_literal_false() {
        let rows = parse_csv("titulo,visivel\na,true\nb,TRUE\nc,1\nd,FALSE\ne,false\nf,").unwrap();
        let flags: Vec<bool> = rows.iter().map(|r| r.record.visible).collect();
        assert_eq!(flags, vec![true, true, true, false, false, true]);
    }

    #[test]
    fn parse_quoted_field_keeps_comma() {
        let rows = parse_csv("titulo,descricao\nPolo,\"azul, com logotipo\"").unwrap();
        assert_eq!(
            rows[0].record.description.as_deref(),
            Some("azul, com logotipo")
        );
    }

    #[test]
    fn parse_empty_optionals_are_absent_not_empty() {
        let rows = parse_csv("titulo,descricao,cliente\nPolo,,  ").unwrap();
        assert_eq!(rows[0].record.description, None);
        assert_eq!(rows[0].record.client, None);
    }

    #[test]
    fn parse_short_row_leaves_missing_fields_absent() {
        let rows = parse_csv("titulo,descricao,ordem\nPolo").unwrap();
        assert!(rows[0].is_valid());
        assert_eq!(rows[0].record.description, None);
        assert_eq!(rows[0].record.order, 0);
    }

    #[test]
    fn parse_duplicate_header_last_wins() {
        let rows = parse_csv("titulo,titulo\nerrado,certo").unwrap();
        assert_eq!(rows[0].record.title, "certo");
    }

    #[test]
    fn parse_handles_crlf_input() {
        let rows = parse_csv("titulo,cliente\r\nPolo,EDP\r\n").unwrap();
        assert_eq!(rows[0].record.title, "Polo");
        assert_eq!(rows[0].record.client.as_deref(), Some("EDP"));
    }
}
