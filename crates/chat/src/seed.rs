use crate::message::{ImageResource, NewMessage, Sender};

/// Sample conversation, oldest first, as `(seconds before now, message)`.
pub fn sample_messages(now_millis: i64) -> Vec<NewMessage> {
    let at = |seconds_ago: i64| now_millis - seconds_ago * 1_000;

    vec![
        NewMessage::text(Sender::Peer, "Hi there!", at(120)),
        NewMessage::text(Sender::Me, "Hey!", at(110)),
        NewMessage::text(Sender::Peer, "Lovely weather today.", at(100)),
        NewMessage::text(Sender::Me, "It is, perfect for a walk.", at(90)),
        NewMessage::image(Sender::Peer, ImageResource::AppIcon, at(80)),
        NewMessage::text(Sender::Me, "Where did you go?", at(70)),
        NewMessage::image(Sender::Me, ImageResource::Star, at(60)),
        NewMessage::text(Sender::Peer, "Took a few photos.", at(50)),
        NewMessage::image(Sender::Peer, ImageResource::Gallery, at(40)),
        NewMessage::text(Sender::Me, "These look great!", at(30)),
        NewMessage::text(Sender::Peer, "Thanks!", at(20)),
        NewMessage::text(Sender::Me, "Any time.", at(10)),
        NewMessage::image(Sender::Peer, ImageResource::Info, at(5)),
    ]
}
