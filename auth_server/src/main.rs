#[tokio::main]
async fn main() {
    auth_server::frameworks::server::run().await;
}
