use clap::Parser;

use unit_currency_converter_lib::cli::App;

#[tokio::main]
async fn main() {
    let app = App::parse();

    if let Err(e) = unit_currency_converter_lib::run(app).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
