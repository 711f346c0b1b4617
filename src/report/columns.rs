use log::warn;

use crate::table::RecordTable;

const LABELS: &[(&str, &str)] = &[
    ("data", "Data"),
    ("data_vencimento", "Vencimento"),
    ("vencimento", "Vencimento"),
    ("data_recebimento", "Recebimento"),
    ("recebimento", "Recebimento"),
    ("descricao", "Descrição"),
    ("cliente", "Cliente"),
    ("categoria", "Categoria"),
    ("valor", "Valor (R$)"),
    ("valor_total", "Valor Total (R$)"),
    ("a_receber", "A Receber (R$)"),
    ("situacao", "Situação"),
];

/// Columns preselected for a report when the user picks none.
const DEFAULT_COLUMNS: &[&str] = &[
    "vencimento",
    "recebimento",
    "descricao",
    "cliente",
    "categoria",
    "valor",
    "situacao",
];

const FALLBACK_COLUMN_COUNT: usize = 8;

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Display label for a column name.
pub fn display_label(column: &str) -> String {
    if let Some((_, label)) = LABELS.iter().find(|(name, _)| *name == column) {
        return label.to_string();
    }
    column
        .split('_')
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The recommended column selection for `table`.
pub fn default_columns(table: &RecordTable) -> Vec<String> {
    let preferred: Vec<String> = DEFAULT_COLUMNS
        .iter()
        .filter(|c| table.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if !preferred.is_empty() {
        return preferred;
    }

    table
        .columns()
        .iter()
        .take(FALLBACK_COLUMN_COUNT)
        .cloned()
        .collect()
}

/// Ordered report columns with their display labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub columns: Vec<String>,
    pub labels: Vec<String>,
}

impl RenderSpec {
    /// Resolve a user selection against the columns `table` actually has.
    ///
    /// Unknown names are dropped. An empty result falls back to every
    /// column of the table.
    pub fn resolve(selected: &[String], table: &RecordTable) -> Self {
        let mut columns: Vec<String> = Vec::with_capacity(selected.len());
        for name in selected {
            if !table.has_column(name) {
                warn!("Column '{name}' not found in data; skipping");
            } else if !columns.contains(name) {
                columns.push(name.clone());
            }
        }

        if columns.is_empty() {
            columns = table.columns().to_vec();
        }

        let labels = columns.iter().map(|c| display_label(c)).collect();
        Self { columns, labels }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
