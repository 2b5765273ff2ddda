use mock_server::{Db, Store};
use tokio::{net::TcpListener, sync::RwLock};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let mut store = Store::default();
    if let (Ok(user), Ok(password)) = (std::env::var("MOCK_USER"), std::env::var("MOCK_PASSWORD")) {
        store = store.with_user(&user, &password);
    }
    let db = Db::new(RwLock::new(store));

    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run(listener, db).await
}
