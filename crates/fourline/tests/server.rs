//! End-to-end tests: a real server on an ephemeral port, driven by real
//! WebSocket clients.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use fourline::prelude::*;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Binds the configured server on an ephemeral port and runs it in the
/// background.
async fn start(builder: ServerBuilder) -> String {
    let server = builder.bind("127.0.0.1:0").build().await.expect("should bind");
    let addr = server.local_addr().expect("should have local addr").to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn ws(addr: &str) -> Ws {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

fn enc(msg: &ClientMessage) -> Message {
    Message::Binary(serde_json::to_vec(msg).unwrap().into())
}

async fn send(ws: &mut Ws, msg: &ClientMessage) {
    ws.send(enc(msg)).await.expect("send should succeed");
}

async fn recv(ws: &mut Ws) -> ServerMessage {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("stream ended unexpectedly")
        .expect("websocket error");
    serde_json::from_slice(&msg.into_data()).expect("frame should decode")
}

async fn expect_seat(ws: &mut Ws) -> SeatId {
    match recv(ws).await {
        ServerMessage::Seat { seat } => seat,
        other => panic!("expected Seat, got {other:?}"),
    }
}

async fn expect_status(ws: &mut Ws, expected: StatusCode) {
    match recv(ws).await {
        ServerMessage::Status { code } if code == expected => {}
        other => panic!("expected Status({expected:?}), got {other:?}"),
    }
}

async fn expect_board(ws: &mut Ws) -> BoardSnapshot {
    match recv(ws).await {
        ServerMessage::Board { board } => board,
        other => panic!("expected Board, got {other:?}"),
    }
}

async fn request(ws: &mut Ws, kind: MatchKind) {
    send(ws, &ClientMessage::RequestMatch { kind }).await;
}

async fn drop_column(ws: &mut Ws, column: i64) {
    send(ws, &ClientMessage::Drop { column }).await;
}

/// Start of a turn: Continue then a fresh snapshot.
async fn expect_turn(ws: &mut Ws) -> BoardSnapshot {
    expect_status(ws, StatusCode::Continue).await;
    expect_board(ws).await
}

fn piece_count(snap: &BoardSnapshot) -> usize {
    snap.cells
        .iter()
        .flatten()
        .filter(|cell| cell.is_some())
        .count()
}

/// A strategy factory that always plays the lowest legal column.
fn lowest_column_factory() -> Arc<dyn Fn() -> Box<dyn MoveStrategy> + Send + Sync> {
    Arc::new(|| {
        Box::new(|b: &Board| {
            (0..b.dims().cols)
                .find(|&c| !b.is_column_full(c))
                .unwrap_or(0)
        }) as Box<dyn MoveStrategy>
    })
}

// ---------------------------------------------------------------------------
// Matchmaking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pvp_seats_follow_arrival_order() {
    let addr = start(ServerBuilder::new()).await;
    let mut a = ws(&addr).await;
    let mut b = ws(&addr).await;

    request(&mut a, MatchKind::PlayerVsPlayer).await;
    // a must be enqueued before b to make the seat order deterministic.
    tokio::time::sleep(Duration::from_millis(20)).await;
    request(&mut b, MatchKind::PlayerVsPlayer).await;

    assert_eq!(expect_seat(&mut a).await, SeatId(0));
    assert_eq!(expect_seat(&mut b).await, SeatId(1));

    // Seat 0 is prompted first, on an empty board.
    let snap = expect_turn(&mut a).await;
    assert_eq!(piece_count(&snap), 0);

    // Seat 1 is prompted only after seat 0 moved, and sees that move.
    drop_column(&mut a, 0).await;
    expect_status(&mut a, StatusCode::GoodInput).await;
    let snap = expect_turn(&mut b).await;
    assert_eq!(snap.get(5, 0), Some(SeatId(0)));
    assert_eq!(piece_count(&snap), 1);
}

#[tokio::test]
async fn queues_do_not_interact() {
    let addr = start(ServerBuilder::new().strategy(lowest_column_factory())).await;

    // a waits alone in the versus queue.
    let mut a = ws(&addr).await;
    request(&mut a, MatchKind::PlayerVsPlayer).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    // b asks for a computer match and is seated immediately; a's wait
    // is unaffected.
    let mut b = ws(&addr).await;
    request(&mut b, MatchKind::PlayerVsComputer).await;
    assert_eq!(expect_seat(&mut b).await, SeatId(0));

    // Only a second versus request releases a — into seat 0, since a
    // arrived first.
    let mut c = ws(&addr).await;
    request(&mut c, MatchKind::PlayerVsPlayer).await;
    assert_eq!(expect_seat(&mut a).await, SeatId(0));
    assert_eq!(expect_seat(&mut c).await, SeatId(1));
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

#[tokio::test]
async fn intake_rejects_noise_until_a_request_arrives() {
    let addr = start(ServerBuilder::new()).await;
    let mut client = ws(&addr).await;

    // Not JSON at all.
    client
        .send(Message::Text("open sesame".into()))
        .await
        .expect("send should succeed");
    expect_status(&mut client, StatusCode::BadInput).await;

    // Valid message, wrong phase.
    drop_column(&mut client, 3).await;
    expect_status(&mut client, StatusCode::BadInput).await;

    // The connection is still serviceable afterwards.
    request(&mut client, MatchKind::PlayerVsComputer).await;
    assert_eq!(expect_seat(&mut client).await, SeatId(0));
}

// ---------------------------------------------------------------------------
// Session play
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_columns_are_rejected_without_losing_the_turn() {
    let addr = start(ServerBuilder::new().strategy(lowest_column_factory())).await;
    let mut client = ws(&addr).await;
    request(&mut client, MatchKind::PlayerVsComputer).await;

    assert_eq!(expect_seat(&mut client).await, SeatId(0));
    expect_turn(&mut client).await;

    drop_column(&mut client, -1).await;
    expect_status(&mut client, StatusCode::BadInput).await;
    drop_column(&mut client, 7).await;
    expect_status(&mut client, StatusCode::BadInput).await;
    drop_column(&mut client, 3).await;
    expect_status(&mut client, StatusCode::GoodInput).await;

    // The rejected columns left no trace: our piece landed, the
    // computer answered, nothing else.
    let snap = expect_turn(&mut client).await;
    assert_eq!(snap.get(5, 3), Some(SeatId(0)));
    assert_eq!(piece_count(&snap), 2);
}

#[tokio::test]
async fn vertical_win_is_broadcast_to_both_players() {
    let addr = start(ServerBuilder::new()).await;
    let mut a = ws(&addr).await;
    request(&mut a, MatchKind::PlayerVsPlayer).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let mut b = ws(&addr).await;
    request(&mut b, MatchKind::PlayerVsPlayer).await;

    assert_eq!(expect_seat(&mut a).await, SeatId(0));
    assert_eq!(expect_seat(&mut b).await, SeatId(1));

    // a stacks column 0; b wanders across columns 1..=3.
    for b_col in [1, 2, 3] {
        expect_turn(&mut a).await;
        drop_column(&mut a, 0).await;
        expect_status(&mut a, StatusCode::GoodInput).await;

        expect_turn(&mut b).await;
        drop_column(&mut b, b_col).await;
        expect_status(&mut b, StatusCode::GoodInput).await;
    }

    // a's fourth piece in column 0 completes the line.
    expect_turn(&mut a).await;
    drop_column(&mut a, 0).await;
    expect_status(&mut a, StatusCode::GoodInput).await;

    expect_status(&mut a, StatusCode::Player0Won).await;
    let final_a = expect_board(&mut a).await;
    expect_status(&mut b, StatusCode::Player0Won).await;
    let final_b = expect_board(&mut b).await;

    assert_eq!(final_a, final_b);
    for row in 2..=5 {
        assert_eq!(final_a.get(row, 0), Some(SeatId(0)));
    }
    assert_eq!(piece_count(&final_a), 7);
}

#[tokio::test]
async fn tiny_board_fills_to_a_draw() {
    let builder = ServerBuilder::new()
        .board_dims(BoardDims { rows: 1, cols: 3 })
        .strategy(lowest_column_factory());
    let addr = start(builder).await;
    let mut client = ws(&addr).await;
    request(&mut client, MatchKind::PlayerVsComputer).await;

    assert_eq!(expect_seat(&mut client).await, SeatId(0));
    expect_turn(&mut client).await;
    drop_column(&mut client, 0).await;
    expect_status(&mut client, StatusCode::GoodInput).await;

    // Computer takes column 1; our second prompt shows both pieces.
    let snap = expect_turn(&mut client).await;
    assert_eq!(snap.get(0, 0), Some(SeatId(0)));
    assert_eq!(snap.get(0, 1), Some(SeatId(1)));

    // Last open cell: no line of four fits in a 1x3 board, so this is
    // a draw.
    drop_column(&mut client, 2).await;
    expect_status(&mut client, StatusCode::GoodInput).await;
    expect_status(&mut client, StatusCode::Draw).await;
    let final_snap = expect_board(&mut client).await;
    assert_eq!(piece_count(&final_snap), 3);
}

// ---------------------------------------------------------------------------
// Move deadline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn expired_move_deadline_forfeits_the_match() {
    let builder = ServerBuilder::new().move_timeout(Duration::from_millis(100));
    let addr = start(builder).await;
    let mut client = ws(&addr).await;
    request(&mut client, MatchKind::PlayerVsComputer).await;

    assert_eq!(expect_seat(&mut client).await, SeatId(0));
    expect_turn(&mut client).await;

    // Sit on the turn past the deadline. The session ends as on a
    // disconnect: no further protocol frames, just a dead stream.
    let next = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("timed out waiting for the session to end");
    match next {
        None | Some(Ok(Message::Close(_))) | Some(Err(_)) => {}
        Some(Ok(frame)) => panic!("expected the stream to end, got {frame:?}"),
    }
}
