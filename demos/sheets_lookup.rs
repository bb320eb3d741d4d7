use anyhow::Context;
use dotenv::dotenv;
use order_lookup::sheets::GoogleSheetsClient;
use order_lookup::{backup_banner, render_outcome, LookupConfig, OrderLookup};
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = match std::env::var("ORDER_LOOKUP_CONFIG") {
        Ok(path) => LookupConfig::from_file(&path)
            .with_context(|| format!("reading config file {}", path))?,
        Err(_) => LookupConfig::default(),
    }
    .apply_env()?;

    let client = GoogleSheetsClient::from_config(&config)?;
    let mut lookup = OrderLookup::from_config(client, &config);

    println!("{}", backup_banner(&lookup.backup_window()));
    println!("Digite o número do pedido (ex: 5678/2025), ':r' para recarregar, vazio para sair.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "" => break,
            ":r" => {
                lookup.reload();
                println!("Cache limpo! Recarregando dados...");
            }
            query => print!("{}", render_outcome(&lookup.search(query).await)),
        }
    }

    Ok(())
}
