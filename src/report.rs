//! Plain-text rendering of lookup outcomes for operators.

use crate::backup_window::BackupWindow;
use crate::currency::format_brl;
use crate::schema::{LookupHit, LookupOutcome, SourceTable};
use crate::utils::format_display_date;
use std::fmt::Write;

pub const SEPARATOR: &str = "---";

/// Banner naming the backup worksheet being tracked.
pub fn backup_banner(window: &BackupWindow) -> String {
    format!(
        "Aba de Backup de Emergencial sendo rastreada: {}",
        window.label()
    )
}

fn headline(origin: &SourceTable) -> String {
    match origin {
        SourceTable::Alta => "Pedido encontrado na aba ALTA".to_string(),
        SourceTable::Emergencial => "Pedido encontrado na aba EMERGENCIAL".to_string(),
        SourceTable::Backup(window) => {
            format!("Pedido encontrado na aba de BACKUP: {}", window.label())
        }
    }
}

/// Detail block for one hit: origin, payment date, status, amount, unit,
/// vehicle/usage and supplier.
pub fn render_hit(hit: &LookupHit) -> String {
    let record = &hit.record;
    let date = record
        .date
        .map(format_display_date)
        .unwrap_or_else(|| "-".to_string());

    let mut out = String::new();
    let _ = writeln!(out, "Origem: {}", hit.origin.label());
    let _ = writeln!(out, "Previsão de pagamento: {}", date);
    let _ = writeln!(out, "Status: {}", record.status);
    let _ = writeln!(out, "Valor: {}", format_brl(record.amount));
    let _ = writeln!(out, "Unidade solicitante: {}", record.requesting_unit);
    let _ = writeln!(out, "Carro/Utilização: {}", record.vehicle_usage);
    let _ = writeln!(out, "Fornecedor: {}", record.supplier);
    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

/// Full report: load warnings, then one block per source that matched, or a
/// not-found line. An empty query renders only the warnings.
pub fn render_outcome(outcome: &LookupOutcome) -> String {
    let mut out = String::new();

    for diagnostic in &outcome.diagnostics {
        let _ = writeln!(
            out,
            "Erro ao carregar aba {}. Erro: {}",
            diagnostic.sheet, diagnostic.message
        );
    }

    if outcome.is_empty_query() {
        return out;
    }

    if outcome.hits.is_empty() {
        let _ = writeln!(
            out,
            "Pedido '{}' não encontrado em nenhuma aba.",
            outcome.query
        );
        return out;
    }

    for hit in &outcome.hits {
        let _ = writeln!(out, "{}", headline(&hit.origin));
        out.push_str(&render_hit(hit));
    }

    out
}
