use bevy::prelude::*;

use crate::chat::{
    CLOSE_ABNORMAL, ChatConnection, ChatEvent, LineKind, LineOrder, Placement, ViewChange,
    chat_event_channel, connection_target,
};
use crate::chat_bevy::types::*;

/// Gap kept between the controls bar and the first message line
const CONTROLS_GAP: f32 = 8.0;

/// Build the chat page: controls bar on top, message list underneath
pub fn spawn_chat_ui(
    mut commands: Commands,
    theme: Res<ChatThemeResource>,
    settings: Res<ChatSettings>,
) {
    // Newest line stays in view: bottom-aligned when appending, top when prepending
    let list_alignment = match settings.profile.order {
        LineOrder::Append => JustifyContent::FlexEnd,
        LineOrder::Prepend => JustifyContent::FlexStart,
    };

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            BackgroundColor(theme.background),
            ChatRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: list_alignment,
                    row_gap: Val::Px(4.0),
                    padding: UiRect {
                        left: Val::Px(12.0),
                        right: Val::Px(12.0),
                        top: Val::Px(CONTROLS_GAP),
                        bottom: Val::Px(8.0),
                    },
                    overflow: Overflow::clip_y(),
                    ..default()
                },
                MessageList,
            ));

            root.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(0.0),
                    left: Val::Px(0.0),
                    width: Val::Percent(100.0),
                    padding: UiRect::all(Val::Px(8.0)),
                    column_gap: Val::Px(8.0),
                    align_items: AlignItems::Center,
                    ..default()
                },
                BackgroundColor(theme.controls_background),
                ControlsBar,
            ))
            .with_children(|controls| {
                controls
                    .spawn((
                        Node {
                            flex_grow: 1.0,
                            padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                            ..default()
                        },
                        BackgroundColor(theme.input_background),
                        InputField,
                    ))
                    .with_children(|field| {
                        field.spawn((
                            Text::new(""),
                            TextFont::from_font_size(theme.font_size),
                            TextColor(theme.text),
                            InputText,
                        ));
                    });

                controls.spawn((
                    Text::new(""),
                    TextFont::from_font_size(theme.font_size),
                    TextColor(theme.status_text),
                    StatusText,
                ));
            });
        });

    log::info!("Chat UI spawned");
}

/// Resolve the connection target and open the one connection of this client
pub fn open_connection(mut commands: Commands, settings: Res<ChatSettings>) {
    let url = match connection_target(&settings.origin, settings.profile.scheme) {
        Ok(url) => url,
        Err(e) => {
            log::error!("Cannot connect chat: {}", e);
            // Surfaces like any failed connection: error, then close
            let (events, receiver) = chat_event_channel();
            events.emit(ChatEvent::Error {
                data: e.to_string(),
            });
            events.emit(ChatEvent::Close {
                code: CLOSE_ABNORMAL,
                reason: "Invalid origin".to_string(),
            });
            commands.insert_resource(ChatEventReceiverResource(receiver));
            return;
        }
    };

    log::info!("Opening chat connection to {}", url);
    let (connection, receiver) = ChatConnection::connect(url);
    commands.insert_resource(ChatConnectionResource(connection));
    commands.insert_resource(ChatEventReceiverResource(receiver));
}

/// Drain connection events and apply them to the page
pub fn process_chat_events(
    mut commands: Commands,
    receiver: Option<Res<ChatEventReceiverResource>>,
    mut view: ResMut<ChatViewResource>,
    theme: Res<ChatThemeResource>,
    lists: Query<Entity, With<MessageList>>,
    mut status: Query<&mut Text, With<StatusText>>,
) {
    let Some(receiver) = receiver else {
        return;
    };

    // Events wait in the channel until the list exists
    let Ok(list) = lists.single() else {
        return;
    };

    while let Some(event) = receiver.try_recv() {
        log::debug!("Processing chat event: {:?}", event);
        match view.apply(&event) {
            ViewChange::LineInserted { line, placement } => {
                let color = match line.kind {
                    LineKind::Normal => theme.text,
                    LineKind::Error => theme.error_text,
                };
                let entity = commands
                    .spawn(line_bundle(line.text, line.kind, color, theme.font_size))
                    .id();

                match placement {
                    Placement::Tail => {
                        commands.entity(list).add_child(entity);
                    }
                    Placement::Head => {
                        commands.entity(list).insert_children(0, &[entity]);
                    }
                }
            }
            ViewChange::StatusChanged(glyph) => {
                for mut text in &mut status {
                    text.0 = glyph.as_str().to_string();
                }
            }
            ViewChange::Unchanged => {}
        }
    }
}

fn line_bundle(text: String, kind: LineKind, color: Color, font_size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont::from_font_size(font_size),
        TextColor(color),
        MessageLine { kind },
    )
}

/// Mirror the input buffer into the input field
pub fn sync_input_text(
    view: Res<ChatViewResource>,
    mut texts: Query<&mut Text, With<InputText>>,
) {
    if !view.is_changed() {
        return;
    }

    for mut text in &mut texts {
        if text.0 != view.input() {
            text.0 = view.input().to_string();
        }
    }
}

/// Keep the message list clear of the controls bar
pub fn offset_message_list(
    controls: Query<&ComputedNode, (With<ControlsBar>, Changed<ComputedNode>)>,
    mut lists: Query<&mut Node, With<MessageList>>,
) {
    let Ok(computed) = controls.single() else {
        return;
    };

    let top = Val::Px(computed.size().y * computed.inverse_scale_factor() + CONTROLS_GAP);
    for mut node in &mut lists {
        if node.padding.top != top {
            node.padding.top = top;
        }
    }
}
