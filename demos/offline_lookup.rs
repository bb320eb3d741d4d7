use chrono::NaiveDate;
use order_lookup::{
    backup_banner, backup_sheet_name, render_outcome, FixedClock, InMemorySource, OrderLookup,
};

fn sheet(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

const HEADER: &[&str] = &[
    "PEDIDO",
    "STATUS",
    "DATA",
    "VALOR",
    "UNIDADE",
    "CARRO | UTILIZAÇÃO",
    "FORNECEDOR",
];

#[tokio::main]
async fn main() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let backup = backup_sheet_name(today);

    let source = InMemorySource::new()
        .with_sheet(
            "ALTA",
            sheet(&[
                &["Pedidos ALTA"],
                HEADER,
                &["5678/2025", "AGUARDANDO PAGAMENTO", "20/06/2025", "R$ 1.234,50", "JARDIM MONTANHÊS", "CARRO 1020", "AUTO PEÇAS"],
            ]),
        )
        .with_sheet(
            "EMERGENCIAL",
            sheet(&[
                &["Pedidos EMERGENCIAL"],
                HEADER,
                &["99/2025", "EM COTAÇÃO", "16/06/2025", "R$ 12.345,67", "CONTAGEM", "CARRO 2040", "RETÍFICA MINAS"],
            ]),
        )
        .with_sheet(
            backup,
            sheet(&[
                &["Backup"],
                HEADER,
                &["5678/2025", "LANÇADO", "28/05/2025", "R$ 1.234,50", "JARDIM MONTANHÊS", "CARRO 1020", "AUTO PEÇAS"],
            ]),
        );

    let mut lookup = OrderLookup::new(source, FixedClock(today));
    println!("{}\n", backup_banner(&lookup.backup_window()));

    for query in ["5678/2025", " 99/2025 ", "1/2024"] {
        println!("> {}", query.trim());
        print!("{}", render_outcome(&lookup.search(query).await));
        println!();
    }
}
