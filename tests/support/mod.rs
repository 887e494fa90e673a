// Shared helpers for starting a gallery server inside integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use shooting_gallery::ws::protocol::ServerMsg;
use shooting_gallery::{AppState, Config};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Start a server on an ephemeral port and return its address.
pub async fn spawn_server(config: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    let state = AppState::new(config);

    tokio::spawn(async move {
        shooting_gallery::run(listener, state, std::future::pending())
            .await
            .expect("server failed");
    });

    addr
}

pub async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("websocket handshake");
    client
}

// Read the next server message, skipping control frames.
pub async fn next_msg(client: &mut Client) -> ServerMsg {
    loop {
        let frame = tokio::time::timeout(std::time::Duration::from_secs(5), client.next())
            .await
            .expect("server replied in time")
            .expect("stream open")
            .expect("valid frame");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("server message");
        }
    }
}

pub async fn send_json(client: &mut Client, value: serde_json::Value) {
    client
        .send(Message::Text(value.to_string()))
        .await
        .expect("send frame");
}
