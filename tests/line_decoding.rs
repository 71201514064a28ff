use std::time::Duration;

use irclog::{
    entity::{Message, Sender},
    ingest::{
        driver::{IngestConfig, Ingestor},
        input::decode_log,
    },
    parse::timestamp::TimeZoneMode,
    persist::{LogStore, sqlite::SqliteLogStore},
    types::MessageType,
};

fn ingestor() -> Ingestor<SqliteLogStore> {
    let store = SqliteLogStore::open_in_memory().expect("open sqlite");
    Ingestor::new(
        store,
        IngestConfig {
            network: "Libera".to_string(),
            buffer: "#chat".to_string(),
            commit_interval: Duration::from_secs(60),
            zone: TimeZoneMode::Utc,
        },
    )
    .expect("ingestor")
}

fn ingest(input: &str) -> (Vec<Message>, Vec<Sender>) {
    let mut ing = ingestor();
    ing.run(input).expect("ingest");
    let messages = ing.store().load_messages().expect("messages");
    let senders = ing.store().load_senders().expect("senders");
    (messages, senders)
}

fn sender<'a>(senders: &'a [Sender], id: i64) -> &'a Sender {
    senders.iter().find(|s| s.id == id).expect("sender exists")
}

#[test]
fn privmsg_example_line() {
    let mut ing = ingestor();
    ing.run("20230615T120000  <alice> hello world\n").expect("ingest");

    let messages = ing.store().load_messages().expect("messages");
    assert_eq!(messages.len(), 1);
    let msg = &messages[0];
    assert_eq!(msg.kind, MessageType::PrivMsg);
    assert_eq!(msg.text, "hello world");
    assert_eq!(msg.timestamp, 1_686_830_400);

    let snd = ing.cache().sender_by_id(msg.senderid).expect("sender");
    assert_eq!((snd.nick.as_str(), snd.user.as_str(), snd.host.as_str()), ("alice", "", ""));

    let buf = ing.cache().buffer_by_id(msg.bufferid).expect("buffer");
    assert_eq!(buf.name, "#chat");
    let net = ing.cache().network_by_id(buf.networkid).expect("network");
    assert_eq!(net.name, "Libera");
}

#[test]
fn join_example_line() {
    let (messages, senders) = ingest("20230615T120005  ** alice <alice!a@host> has joined #chat\n");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, MessageType::Join);
    assert_eq!(messages[0].text, "");
    assert_eq!(messages[0].timestamp, 1_686_830_405);
    let snd = sender(&senders, messages[0].senderid);
    assert_eq!((snd.nick.as_str(), snd.user.as_str(), snd.host.as_str()), ("alice", "a", "host"));
}

#[test]
fn notice_and_action_lines() {
    let (messages, senders) = ingest(concat!(
        "2023-06-15T12:00:00  -NickServ- You are now identified.\n",
        "2023-06-15T12:00:01  * alice waves at everyone\n",
        "2023-06-15T12:00:02  <alice>\n",
    ));
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].kind, MessageType::Notice);
    assert_eq!(messages[0].text, "You are now identified.");
    assert_eq!(sender(&senders, messages[0].senderid).nick, "NickServ");
    assert_eq!(messages[1].kind, MessageType::Action);
    assert_eq!(messages[1].text, "waves at everyone");
    assert_eq!(messages[2].text, "");
    assert_eq!(messages[1].senderid, messages[2].senderid);
}

#[test]
fn plain_chat_reuses_sender_seen_on_join() {
    let (messages, senders) = ingest(concat!(
        "2023-06-15T12:00:00  ** alice <alice!a@host> has joined #chat\n",
        "2023-06-15T12:00:01  <alice> hi\n",
    ));
    assert_eq!(senders.len(), 1);
    assert_eq!(messages[0].senderid, messages[1].senderid);
}

#[test]
fn part_with_and_without_reason() {
    let (messages, senders) = ingest(concat!(
        "2023-06-15T12:00:00  ** bob <bob!b@example.org> has left #chat (gone fishing)\n",
        "2023-06-15T12:00:01  ** bob <bob!b@example.org> has left #chat\n",
    ));
    assert_eq!(messages[0].kind, MessageType::Part);
    assert_eq!(messages[0].text, "gone fishing");
    assert_eq!(messages[1].kind, MessageType::Part);
    assert_eq!(messages[1].text, "");
    assert_eq!(senders.len(), 1);
    let snd = sender(&senders, messages[0].senderid);
    assert_eq!((snd.user.as_str(), snd.host.as_str()), ("b", "example.org"));
}

#[test]
fn quit_reason_drops_closing_paren() {
    let (messages, _) = ingest(concat!(
        "2023-06-15T12:00:00  ** bob <bob!b@h> has quit IRC (Quit: see you (later))\n",
        "2023-06-15T12:00:01  ** bob <bob!b@h> has quit IRC\n",
    ));
    assert_eq!(messages[0].kind, MessageType::Quit);
    assert_eq!(messages[0].text, "Quit: see you (later)");
    assert_eq!(messages[1].text, "");
}

#[test]
fn kick_is_attributed_to_the_victim() {
    let (messages, senders) = ingest(concat!(
        "2023-06-15T12:00:00  ** mallory <mallory!m@bad> has joined #chat\n",
        "2023-06-15T12:00:01  ** mallory was kicked by alice (spamming)\n",
        "2023-06-15T12:00:02  ** eve was kicked by alice\n",
    ));
    assert_eq!(messages[1].kind, MessageType::Kick);
    assert_eq!(messages[1].senderid, messages[0].senderid);
    assert_eq!(messages[1].text, "alice spamming");

    assert_eq!(messages[2].text, "alice");
    let eve = sender(&senders, messages[2].senderid);
    assert_eq!((eve.nick.as_str(), eve.user.as_str()), ("eve", ""));
    // The kicker is never registered as a sender.
    assert!(senders.iter().all(|s| s.nick != "alice"));
}

#[test]
fn kick_with_trailing_text_but_no_reason() {
    let (messages, _) = ingest("2023-06-15T12:00:00  ** eve was kicked by alice \n");
    assert_eq!(messages[0].text, "alice");
}

#[test]
fn mode_change_text_follows_colon() {
    let (messages, senders) = ingest("2023-06-15T12:00:00  ** ChanServ sets mode: +o alice\n");
    assert_eq!(messages[0].kind, MessageType::ModeChange);
    assert_eq!(messages[0].text, "+o alice");
    assert_eq!(sender(&senders, messages[0].senderid).nick, "ChanServ");
}

#[test]
fn topic_change_strips_closing_quote() {
    let (messages, _) = ingest(
        "2023-06-15T12:00:00  ** alice changes topic to \"Welcome to #chat | be nice\"\n",
    );
    assert_eq!(messages[0].kind, MessageType::TopicChange);
    assert_eq!(messages[0].text, "Welcome to #chat | be nice");
}

#[test]
fn nick_change_keeps_old_identity_and_registers_new_one() {
    let mut ing = ingestor();
    ing.run(concat!(
        "2023-06-15T12:00:00  ** alice <alice!a@host> has joined #chat\n",
        "2023-06-15T12:00:01  ** alice is now known as alice_\n",
        "2023-06-15T12:00:02  <alice_> still me\n",
        "2023-06-15T12:00:03  ** alice is now known as alice_\n",
    ))
    .expect("ingest");

    let messages = ing.store().load_messages().expect("messages");
    let senders = ing.store().load_senders().expect("senders");
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1].kind, MessageType::NickChange);
    assert_eq!(messages[1].text, "alice_");
    assert_eq!(messages[1].senderid, messages[0].senderid);

    let renamed = senders
        .iter()
        .find(|s| s.nick == "alice_")
        .expect("new identity");
    assert_eq!((renamed.user.as_str(), renamed.host.as_str()), ("a", "host"));
    assert_eq!(messages[2].senderid, renamed.id);

    // Repeating the change does not duplicate the new identity.
    assert_eq!(senders.len(), 2);
}

#[test]
fn duplicated_timestamp_is_skipped() {
    let (messages, _) = ingest(
        "2023-06-15T11:00:00  2023-06-15T12:00:00  <alice> hello\n",
    );
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].timestamp, 1_686_830_400);
    assert_eq!(messages[0].text, "hello");
}

#[test]
fn crlf_and_missing_final_newline() {
    let (messages, _) = ingest(concat!(
        "2023-06-15T12:00:00  <alice> one\r\n",
        "2023-06-15T12:00:01  <alice> two",
    ));
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "one");
    assert_eq!(messages[1].text, "two");
}

#[test]
fn input_ending_after_a_timestamp_is_a_clean_end() {
    let mut ing = ingestor();
    let summary = ing
        .run("2023-06-15T12:00:00  <alice> one\n2023-06-15T12:00:01  ")
        .expect("clean end");
    assert_eq!(summary.messages, 1);

    let mut ing = ingestor();
    let summary = ing
        .run("2023-06-15T12:00:00  <alice> one\n2023-06")
        .expect("clean end");
    assert_eq!(summary.messages, 1);
}

#[test]
fn trailing_blank_lines_end_the_log() {
    let (messages, _) = ingest("2023-06-15T12:00:00  <alice> one\n\n\n");
    assert_eq!(messages.len(), 1);
}

#[test]
fn all_rows_reference_the_target_buffer() {
    let mut ing = ingestor();
    ing.run(concat!(
        "2023-06-15T12:00:00  <alice> one\n",
        "2023-06-15T12:00:01  * bob two\n",
        "2023-06-15T12:00:02  ** carol <carol!c@h> has joined #chat\n",
    ))
    .expect("ingest");
    let target = ing.target_buffer().expect("buffer");
    let messages = ing.store().load_messages().expect("messages");
    assert!(messages.iter().all(|m| m.bufferid == target));
    assert_eq!(ing.store().load_buffers().expect("buffers").len(), 1);
}

#[test]
fn first_marker_in_table_order_wins() {
    // The quit reason contains the kick marker, which is checked first.
    let (messages, senders) = ingest(
        "2023-06-15T12:00:00  ** bob <bob!b@h> has quit IRC (was kicked by op)\n",
    );
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, MessageType::Kick);
    assert_eq!(messages[0].text, "op)");
    assert_eq!(senders.len(), 1);
    let bob = sender(&senders, messages[0].senderid);
    assert_eq!((bob.nick.as_str(), bob.user.as_str(), bob.host.as_str()), ("bob", "", ""));
}

#[test]
fn triple_star_prefix_is_a_special_line() {
    let (messages, senders) = ingest("2023-06-15T12:00:00  *** alice <alice!a@h> has joined #chat\n");
    assert_eq!(messages[0].kind, MessageType::Join);
    let snd = sender(&senders, messages[0].senderid);
    assert_eq!((snd.nick.as_str(), snd.user.as_str(), snd.host.as_str()), ("alice", "a", "h"));
}

#[test]
fn latin1_lines_keep_every_byte() {
    let raw = b"2023-06-15T12:00:00  <alice> caf\xE9\n2023-06-15T12:00:01  <bob> caf\xC3\xA9\n";
    let input = decode_log(raw);
    let (messages, _) = ingest(&input);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "caf\u{e9}");
    assert_eq!(messages[1].text, "caf\u{e9}");
}
