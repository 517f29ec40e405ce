use super::ui;
use crate::core::CurrencyDirectoryProvider;
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(provider: &(dyn CurrencyDirectoryProvider + Send + Sync)) -> Result<()> {
    let spinner = ui::new_spinner("Fetching supported currencies...");
    let currencies = provider.fetch_currencies().await;
    spinner.finish_and_clear();

    // An empty directory also covers a failed fetch; the distinction is
    // only visible in the logs.
    if currencies.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No supported currencies available. The provider may be unreachable; run with --verbose for details.",
                ui::StyleType::Error
            )
        );
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for entry in &currencies {
        table.add_row(vec![Cell::new(&entry.code), Cell::new(&entry.name)]);
    }

    println!(
        "{}\n\n{}",
        ui::style_text("Supported currencies", ui::StyleType::Title),
        table
    );
    println!(
        "\n{}",
        ui::style_text(
            &format!("{} currencies supported", currencies.len()),
            ui::StyleType::Subtle
        )
    );

    Ok(())
}
