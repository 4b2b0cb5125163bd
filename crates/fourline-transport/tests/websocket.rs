//! Integration tests for the WebSocket transport: a real listener, a
//! real tungstenite client, real frames over the loopback interface.

#[cfg(feature = "websocket")]
mod websocket {
    use fourline_transport::{Connection, Transport, WebSocketTransport};

    /// Connects a tokio-tungstenite client to the given address.
    async fn connect_client(
        addr: &str,
    ) -> tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    > {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    #[tokio::test]
    async fn accept_and_exchange_frames() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have addr").to_string();

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");
        assert!(server_conn.id().into_inner() > 0);

        // Server → client.
        server_conn
            .send(b"{\"type\":\"Status\"}")
            .await
            .expect("send should succeed");

        use futures_util::StreamExt;
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"{\"type\":\"Status\"}");

        // Client → server, as a binary frame.
        use futures_util::SinkExt;
        use tokio_tungstenite::tungstenite::Message;
        client_ws
            .send(Message::Binary(b"{\"column\":3}".to_vec().into()))
            .await
            .unwrap();

        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"{\"column\":3}");

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn text_frames_are_delivered_as_bytes() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().unwrap().to_string();

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        use futures_util::SinkExt;
        use tokio_tungstenite::tungstenite::Message;
        client_ws
            .send(Message::Text("{\"type\":\"Drop\",\"column\":0}".into()))
            .await
            .unwrap();

        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, b"{\"type\":\"Drop\",\"column\":0}");
    }

    #[tokio::test]
    async fn recv_returns_none_on_client_close() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().unwrap().to_string();

        let server_handle =
            tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        use futures_util::SinkExt;
        use tokio_tungstenite::tungstenite::Message;
        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }
}
