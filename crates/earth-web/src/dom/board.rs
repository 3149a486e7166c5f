use std::cell::RefCell;
use std::collections::HashMap;

use earth_engine::{BoardView, MessageBoard, MessageId, MessageRecord, SubmitOutcome};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use super::{clock, set_display, DraftInput, Elements};
use crate::error::{js_message, WebError};
use crate::storage::LocalStore;

const MESSAGE_CLASS: &str = "message";
const ID_ATTRIBUTE: &str = "data-id";
const DELETE_LABEL: &str = "✖";

thread_local! {
    static BOARD: RefCell<Option<BoardController>> = const { RefCell::new(None) };
}

fn with_board(f: impl FnOnce(&mut BoardController)) {
    BOARD.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(board) = slot.as_mut() {
                f(board);
            }
        }
        Err(_) => log::warn!("board: re-entrant event ignored"),
    });
}

/// Message board state plus the DOM it renders into.
struct BoardController {
    board: MessageBoard<LocalStore>,
    dom: BoardDom,
}

impl BoardController {
    fn open_form(&mut self) {
        self.board.open_form();
        self.dom.render(&self.board.view());
    }

    fn submit(&mut self) {
        let draft = self.dom.input.value();
        match self.board.submit(&draft, clock::now_locale_string()) {
            Ok(SubmitOutcome::Added(_)) => {
                self.dom.input.clear();
                self.dom.render(&self.board.view());
            }
            Ok(SubmitOutcome::Ignored) => {}
            Err(err) => log::error!("board: message not saved: {err}"),
        }
    }

    fn delete(&mut self, id: MessageId) {
        match self.board.delete(id) {
            Ok(_) => self.dom.render(&self.board.view()),
            Err(err) => log::error!("board: delete failed: {err}"),
        }
    }

    fn toggle(&mut self) {
        self.board.toggle_collapsed();
        self.dom.render(&self.board.view());
    }
}

/// Keeps one `.message` block per record, keyed by id.
struct BoardDom {
    document: Document,
    container: HtmlElement,
    toggle: HtmlElement,
    form: HtmlElement,
    input: DraftInput,
    rendered: Vec<(MessageId, Element)>,
}

impl BoardDom {
    /// Bring the DOM in line with `view`: drop blocks for removed ids, create
    /// blocks only for new ids, keep record order.
    fn render(&mut self, view: &BoardView<'_>) {
        let rendered: Vec<MessageId> = self.rendered.iter().map(|(id, _)| *id).collect();
        let plan = RenderPlan::new(&rendered, view.messages);
        if !plan.is_noop() {
            self.apply(plan, view.messages);
        }

        set_display(&self.form, if view.form_open { "flex" } else { "none" });
        set_display(&self.container, if view.list_visible() { "block" } else { "none" });
        set_display(&self.toggle, if view.toggle_visible() { "block" } else { "none" });
        self.toggle.set_text_content(Some(view.toggle_label()));
    }

    fn apply(&mut self, plan: RenderPlan, messages: &[MessageRecord]) {
        let mut blocks: HashMap<MessageId, Element> = std::mem::take(&mut self.rendered).into_iter().collect();
        for id in &plan.remove {
            if let Some(element) = blocks.remove(id) {
                element.remove();
            }
        }
        for message in messages.iter().filter(|m| plan.create.contains(&m.id)) {
            match self.message_block(message) {
                Ok(element) => {
                    blocks.insert(message.id, element);
                }
                Err(err) => log::error!("board: could not render message {}: {err}", message.id.0),
            }
        }

        for id in plan.order {
            let Some(element) = blocks.remove(&id) else { continue };
            // Appending an attached node moves it, which keeps the order.
            if let Err(err) = self.container.append_child(&element) {
                log::warn!("board: {}", js_message(&err));
            }
            self.rendered.push((id, element));
        }
    }

    fn message_block(&self, message: &MessageRecord) -> Result<Element, WebError> {
        let block = self.document.create_element("div")?;
        block.class_list().add_1(MESSAGE_CLASS)?;
        block.set_attribute(ID_ATTRIBUTE, &message.id.0.to_string())?;

        let time = self.document.create_element("div")?;
        time.class_list().add_1("message-time")?;
        time.set_text_content(Some(&message.time));

        let content = self.document.create_element("div")?;
        content.class_list().add_1("message-content")?;
        content.set_text_content(Some(&message.content));

        let delete = self.document.create_element("button")?;
        delete.class_list().add_1("delete-button")?;
        delete.set_text_content(Some(DELETE_LABEL));

        block.append_child(&time)?;
        block.append_child(&content)?;
        block.append_child(&delete)?;
        Ok(block)
    }
}

/// Block changes needed to go from the rendered ids to `messages`.
#[derive(Debug, PartialEq, Eq)]
struct RenderPlan {
    remove: Vec<MessageId>,
    create: Vec<MessageId>,
    /// Final block order, same as record order.
    order: Vec<MessageId>,
}

impl RenderPlan {
    fn new(rendered: &[MessageId], messages: &[MessageRecord]) -> Self {
        let order: Vec<MessageId> = messages.iter().map(|m| m.id).collect();
        Self {
            remove: rendered.iter().copied().filter(|id| !order.contains(id)).collect(),
            create: order.iter().copied().filter(|id| !rendered.contains(id)).collect(),
            order,
        }
    }

    fn is_noop(&self) -> bool {
        self.remove.is_empty() && self.create.is_empty()
    }
}

/// Id of the message whose delete button received `event`.
fn deleted_message(event: &Event) -> Option<MessageId> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest(".delete-button").ok()??;
    let block = target.closest(&format!(".{MESSAGE_CLASS}")).ok()??;
    block.get_attribute(ID_ATTRIBUTE)?.parse().ok().map(MessageId)
}

/// Render the stored messages and wire the board controls.
pub fn install(
    document: &Document,
    elements: &Elements,
    board: MessageBoard<LocalStore>,
) -> Result<(), WebError> {
    let mut controller = BoardController {
        board,
        dom: BoardDom {
            document: document.clone(),
            container: elements.messages.clone(),
            toggle: elements.toggle_messages_button.clone(),
            form: elements.message_form.clone(),
            input: elements.message_input.clone(),
            rendered: Vec::new(),
        },
    };
    controller.dom.render(&controller.board.view());
    BOARD.with(|cell| *cell.borrow_mut() = Some(controller));

    listen(&elements.add_message_button, "click", |_| with_board(|b| b.open_form()))?;
    listen(&elements.submit_message, "click", |_| with_board(|b| b.submit()))?;
    listen(&elements.toggle_messages_button, "click", |_| with_board(|b| b.toggle()))?;
    // One delegated listener covers every delete button, present and future.
    listen(&elements.messages, "click", |event| {
        if let Some(id) = deleted_message(&event) {
            with_board(|b| b.delete(id));
        }
    })?;
    Ok(())
}

/// Attach a page-lifetime listener.
pub(crate) fn listen(
    target: &web_sys::EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), WebError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use earth_engine::{KeyValueStore, MemoryStore};

    use super::*;

    fn ids(board: &MessageBoard<MemoryStore>) -> Vec<MessageId> {
        board.view().messages.iter().map(|m| m.id).collect()
    }

    fn board_with(contents: &[&str]) -> MessageBoard<MemoryStore> {
        let mut board = MessageBoard::open(MemoryStore::new()).unwrap();
        for content in contents {
            board.open_form();
            board.submit(content, "t").unwrap();
        }
        board
    }

    #[test]
    fn first_render_creates_every_block() {
        let board = board_with(&["a", "b"]);
        let plan = RenderPlan::new(&[], board.view().messages);
        assert_eq!(plan.create, ids(&board));
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn adding_a_message_creates_one_block() {
        let mut board = board_with(&["a", "b"]);
        let rendered = ids(&board);

        board.open_form();
        let added = match board.submit("  c  ", "t").unwrap() {
            SubmitOutcome::Added(record) => record,
            SubmitOutcome::Ignored => panic!("draft was not blank"),
        };

        let plan = RenderPlan::new(&rendered, board.view().messages);
        assert_eq!(plan.create, vec![added.id]);
        assert!(plan.remove.is_empty());
        assert_eq!(plan.order.last(), Some(&added.id));
        assert!(!board.view().form_open);
    }

    #[test]
    fn blank_draft_changes_nothing() {
        let mut board = board_with(&["a"]);
        let rendered = ids(&board);
        let stored = board.repository().store().clone();

        board.open_form();
        assert_eq!(board.submit(" \n\t ", "t").unwrap(), SubmitOutcome::Ignored);

        assert!(RenderPlan::new(&rendered, board.view().messages).is_noop());
        assert_eq!(
            board.repository().store().get("messages").unwrap(),
            stored.get("messages").unwrap()
        );
        assert!(board.view().form_open);
    }

    #[test]
    fn deleting_removes_only_its_block() {
        let mut board = board_with(&["same", "same", "other"]);
        let rendered = ids(&board);

        board.delete(rendered[0]).unwrap();

        let plan = RenderPlan::new(&rendered, board.view().messages);
        assert_eq!(plan.remove, vec![rendered[0]]);
        assert!(plan.create.is_empty());
        assert_eq!(plan.order, rendered[1..].to_vec());
    }

    #[test]
    fn unchanged_list_is_a_noop() {
        let board = board_with(&["a", "b"]);
        let rendered = ids(&board);
        let plan = RenderPlan::new(&rendered, board.view().messages);
        assert!(plan.is_noop());
        assert_eq!(plan.order, rendered);
    }
}
