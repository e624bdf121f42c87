//! gymdesk main entrypoint.

use gymdesk::run;
use gymdesk::ui::messages::error;

#[tokio::main]
async fn main() {
    println!();
    if let Err(e) = run().await {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
