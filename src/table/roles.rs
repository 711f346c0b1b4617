use super::RecordTable;

/// What a column means to the report. Each role is resolved by an ordered
/// candidate list; the first name present in the table wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    DueDate,
    ReceiptDate,
    Amount,
    Status,
    Client,
    Category,
}

impl ColumnRole {
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            ColumnRole::DueDate => &["data", "vencimento", "data_vencimento"],
            ColumnRole::ReceiptDate => &["recebimento", "data_recebimento"],
            ColumnRole::Amount => &["valor", "valor_total", "a_receber"],
            ColumnRole::Status => &["situacao", "status"],
            ColumnRole::Client => &["cliente", "nome_cliente"],
            ColumnRole::Category => &["categoria", "tipo", "classificacao"],
        }
    }

    /// The active column for this role in `table`, if any.
    pub fn resolve(self, table: &RecordTable) -> Option<&'static str> {
        self.resolve_in(table.columns())
    }

    pub fn resolve_in<S: AsRef<str>>(self, columns: &[S]) -> Option<&'static str> {
        self.candidates()
            .iter()
            .copied()
            .find(|candidate| columns.iter().any(|c| c.as_ref() == *candidate))
    }

    /// Whether `column` is one of this role's candidates, active or not.
    pub fn matches(self, column: &str) -> bool {
        self.candidates().contains(&column)
    }
}
