#[tokio::main]
async fn main() {
    if let Err(e) = ticketdesk::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
