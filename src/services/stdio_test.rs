use canvas::engine::SaveStatus;
use canvas::input::Tool;

use super::*;

#[tokio::test]
async fn reads_commands_and_skips_garbage() {
    let input = concat!(
        "{\"type\":\"set_tool\",\"tool\":\"draw\"}\n",
        "\n",
        "not json\n",
        "{\"type\":\"undo\"}\n",
        "{\"type\":\"fly\"}\n",
    );
    let (tx, mut rx) = mpsc::channel(8);
    let stats = read_commands(input.as_bytes(), tx).await;
    assert_eq!(stats, ReadStats { accepted: 2, rejected: 2 });

    assert_eq!(rx.recv().await, Some(Command::SetTool { tool: Tool::Draw }));
    assert_eq!(rx.recv().await, Some(Command::Undo));
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn stops_when_session_is_gone() {
    let (tx, rx) = mpsc::channel(8);
    drop(rx);
    let stats = read_commands("{\"type\":\"undo\"}\n{\"type\":\"redo\"}\n".as_bytes(), tx).await;
    assert_eq!(stats.accepted, 0);
}

#[tokio::test]
async fn writes_one_json_object_per_line() {
    let (tx, rx) = mpsc::channel(8);
    tx.send(Action::RenderNeeded).await.unwrap();
    tx.send(Action::SaveStatus { status: SaveStatus::Failed }).await.unwrap();
    drop(tx);

    let out = write_actions(rx, Vec::new()).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec![r#"{"type":"render_needed"}"#, r#"{"type":"save_status","status":{"state":"failed"}}"#]);
}
