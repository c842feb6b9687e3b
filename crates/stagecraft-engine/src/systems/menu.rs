//! Menu navigation.
//!
//! `MenuNavigate` moves the selection between `MenuItem`s ordered by
//! index, wrapping at both ends. `MenuActivate` raises `MenuActivated`
//! for the selected item and turns load/quit actions into level requests.

use hecs::{Entity, World};
use tracing::debug;

use stagecraft_core::components::MenuItem;
use stagecraft_core::enums::{MenuAction, NavDirection};
use stagecraft_core::events::{EventKind, GameEvent};

use crate::context::{AppContext, LevelRequest, Services};

/// Menu entities sorted top to bottom.
fn ordered_items(world: &World) -> Vec<(Entity, u32, bool)> {
    let mut items: Vec<(Entity, u32, bool)> = world
        .query::<&MenuItem>()
        .iter()
        .map(|(entity, item)| (entity, item.index, item.selected))
        .collect();
    items.sort_by_key(|&(entity, index, _)| (index, entity.id()));
    items
}

/// Move the selection one step. Selects the first item if none is selected.
pub fn navigate(world: &mut World, direction: NavDirection) -> Option<Entity> {
    let items = ordered_items(world);
    if items.is_empty() {
        return None;
    }
    let current = items.iter().position(|&(_, _, selected)| selected);
    let next = match (current, direction) {
        (None, _) => 0,
        (Some(i), NavDirection::Down) => (i + 1) % items.len(),
        (Some(i), NavDirection::Up) => (i + items.len() - 1) % items.len(),
    };
    for (pos, &(entity, _, _)) in items.iter().enumerate() {
        if let Ok(mut item) = world.get::<&mut MenuItem>(entity) {
            item.selected = pos == next;
        }
    }
    Some(items[next].0)
}

/// The selected item's action, if anything is selected.
pub fn selected_action(world: &World) -> Option<MenuAction> {
    world
        .query::<&MenuItem>()
        .iter()
        .find(|(_, item)| item.selected)
        .map(|(_, item)| item.action)
}

fn on_activated(action: MenuAction, services: &mut Services) {
    match action {
        MenuAction::LoadLevel(level) => services.request_level(LevelRequest::Load(level)),
        MenuAction::Quit => services.request_level(LevelRequest::Quit),
        MenuAction::None => {}
    }
}

pub fn install(ctx: &mut AppContext) {
    ctx.on(EventKind::MenuNavigate, |event, services| {
        if let GameEvent::MenuNavigate { direction } = event {
            navigate(&mut services.world, *direction);
        }
    });
    ctx.on(EventKind::MenuActivate, |_, services| {
        match selected_action(&services.world) {
            Some(action) => services.queue_event(GameEvent::MenuActivated { action }),
            None => debug!("menu activated with nothing selected"),
        }
    });
    ctx.on(EventKind::MenuActivated, |event, services| {
        if let GameEvent::MenuActivated { action } = event {
            on_activated(*action, services);
        }
    });
}
