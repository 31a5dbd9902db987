use tokio::net::TcpListener;

/// Stand-in for the Communication API on its usual dev port. `PORT` overrides it.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = mock_server::listen_port(std::env::var("PORT").ok().as_deref())?;
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let addr = listener.local_addr()?;
    println!("mock Communication API on http://{addr}/Communication");
    println!("partitions: {}", mock_server::CATEGORIES.join(", "));
    mock_server::run_with_state(listener, mock_server::MockState::new()).await
}
