use std::cell::RefCell;
use std::rc::Rc;

use vitrine_engine::coords::Rect;
use vitrine_engine::dom::{Document, NodeId, Surface};
use vitrine_engine::input::{InputEvent, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent, TextEvent};
use vitrine_engine::runtime::{DomEvent, EventKind, EventTarget, Runtime};
use vitrine_engine::time::ManualClock;

use super::*;
use crate::component::Component;
use crate::error::ConfigError;
use crate::testing::{blank_document, runtime, Solo};

type Sent = Rc<RefCell<Vec<(String, FormData)>>>;

/// Records submissions; answers with the queued results, then `Ok`.
fn recording_transport(results: Vec<Result<(), SubmitError>>) -> (Box<dyn FormTransport>, Sent) {
    let sent: Sent = Rc::default();
    let log = Rc::clone(&sent);
    let mut results = results.into_iter();
    let transport = move |url: &str, data: &FormData| {
        log.borrow_mut().push((url.to_string(), data.clone()));
        results.next().unwrap_or(Ok(()))
    };
    (Box::new(transport), sent)
}

struct Fields {
    name: NodeId,
    company: NodeId,
    email: NodeId,
    phone: NodeId,
    message: NodeId,
    agreement: NodeId,
    submit: NodeId,
}

/// `form#footerForm` with one wrapper div per field, fields stacked 40 px apart.
fn contact_document() -> (Document, Fields) {
    let mut doc = blank_document();
    let root = doc.root();
    let form = doc.append_element(root, "form");
    doc.set_attribute(form, "id", "footerForm");

    let mut row = 0.0;
    let mut field = |doc: &mut Document, tag: &str, name: &str, kind: Option<&str>| {
        let wrap = doc.append_element(form, "div");
        let node = doc.append_element(wrap, tag);
        doc.set_attribute(node, "name", name);
        if let Some(kind) = kind {
            doc.set_attribute(node, "type", kind);
        }
        doc.set_bounds(node, Rect::new(0.0, row, 300.0, 30.0));
        row += 40.0;
        node
    };

    let name = field(&mut doc, "input", "name", None);
    let company = field(&mut doc, "input", "company", None);
    let email = field(&mut doc, "input", "email", Some("email"));
    let phone = field(&mut doc, "input", "phone", Some("tel"));
    let message = field(&mut doc, "textarea", "message", None);
    let agreement = field(&mut doc, "input", "agreement", Some("checkbox"));

    let submit = doc.append_element(form, "button");
    doc.set_attribute(submit, "type", "submit");
    doc.set_text(submit, "Send");
    doc.set_bounds(submit, Rect::new(0.0, 300.0, 120.0, 30.0));

    let fields = Fields { name, company, email, phone, message, agreement, submit };
    (doc, fields)
}

fn setup_with(
    options: FormOptions,
    results: Vec<Result<(), SubmitError>>,
) -> (Runtime<ManualClock>, Solo<FormValidator>, Fields, Sent) {
    let (doc, fields) = contact_document();
    let mut rt = runtime(doc);
    let (transport, sent) = recording_transport(results);
    let validator = rt
        .with_ctx(|ctx| FormValidator::create(ctx, "#footerForm", options, transport))
        .unwrap();
    (rt, Solo(validator), fields, sent)
}

fn setup() -> (Runtime<ManualClock>, Solo<FormValidator>, Fields, Sent) {
    setup_with(FormOptions::default(), Vec::new())
}

fn click(rt: &mut Runtime<ManualClock>, app: &mut Solo<FormValidator>, node: NodeId) {
    let b = rt.document().bounds(node);
    let (x, y) = (b.origin.x + b.size.x / 2.0, b.origin.y + b.size.y / 2.0);
    for state in [MouseButtonState::Pressed, MouseButtonState::Released] {
        rt.push_event(InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        }));
    }
    rt.pump(app);
}

fn type_text(rt: &mut Runtime<ManualClock>, app: &mut Solo<FormValidator>, text: &str) {
    rt.push_event(InputEvent::Text(TextEvent { text: text.to_string() }));
    rt.pump(app);
}

fn error_text(rt: &Runtime<ManualClock>, field: NodeId) -> Option<String> {
    let doc = rt.document();
    let slot = doc.query(doc.parent(field), ".error-message")?;
    doc.has_class(slot, "show").then(|| doc.text(slot).unwrap_or_default().to_string())
}

fn fill_valid(rt: &mut Runtime<ManualClock>, f: &Fields) {
    let doc = rt.document_mut();
    doc.set_value(f.name, "Анна Иванова");
    doc.set_value(f.company, "Vitrine");
    doc.set_value(f.email, "anna@example.com");
    doc.set_value(f.phone, "+7 (912) 345-67-89");
    doc.set_value(f.message, "Нужна консультация по проекту");
    doc.set_checked(f.agreement, true);
}

fn modals(rt: &Runtime<ManualClock>) -> Vec<NodeId> {
    rt.document().query_all(None, ".form-success-modal")
}

// ── Construction ──────────────────────────────────────────────────────────

#[test]
fn missing_form_is_config_error() {
    let mut rt = runtime(blank_document());
    let (transport, _) = recording_transport(Vec::new());
    let err = rt
        .with_ctx(|ctx| FormValidator::create(ctx, "#footerForm", FormOptions::default(), transport))
        .unwrap_err();
    assert_eq!(err, ConfigError::TargetNotFound { target: "#footerForm".into() });
}

#[test]
fn default_options() {
    let o = FormOptions::default();
    assert!(o.validate_on_blur && o.validate_on_input && o.validate_on_submit && o.scroll_to_error);
    assert_eq!(o.submit_url, "/api/forms/submit");
    assert_eq!((o.error_class.as_str(), o.success_class.as_str()), ("error", "success"));
    assert_eq!(o.success_modal_ms, 5000.0);
    assert_eq!(o.messages.locale, "ru");
}

// ── Live validation ───────────────────────────────────────────────────────

#[test]
fn typing_validates_the_field() {
    let (mut rt, mut app, f, _) = setup();
    click(&mut rt, &mut app, f.name);
    type_text(&mut rt, &mut app, "A");

    assert!(rt.document().has_class(f.name, "error"));
    assert_eq!(error_text(&rt, f.name).as_deref(), Some("Имя должно содержать минимум 2 символа"));

    type_text(&mut rt, &mut app, "nna");
    let doc = rt.document();
    assert!(doc.has_class(f.name, "success"));
    assert!(!doc.has_class(f.name, "error"));
    assert_eq!(error_text(&rt, f.name), None);
    let slot = doc.query(doc.parent(f.name), ".error-message").unwrap();
    assert!(doc.has_class(slot, "hidden"));
}

#[test]
fn error_slot_is_reused() {
    let (mut rt, mut app, f, _) = setup();
    click(&mut rt, &mut app, f.email);
    type_text(&mut rt, &mut app, "a");
    type_text(&mut rt, &mut app, "@");
    let doc = rt.document();
    assert_eq!(doc.query_all(doc.parent(f.email), ".error-message").len(), 1);
    assert_eq!(error_text(&rt, f.email).as_deref(), Some("Введите корректный email адрес"));
}

#[test]
fn blur_validates_untouched_field() {
    let (mut rt, mut app, f, _) = setup();
    click(&mut rt, &mut app, f.company);
    assert!(!rt.document().has_class(f.company, "error"));

    let root = rt.document().root();
    click(&mut rt, &mut app, root);
    assert!(rt.document().has_class(f.company, "error"));
    assert_eq!(error_text(&rt, f.company).as_deref(), Some("Введите название компании"));
}

#[test]
fn checkbox_change_validates() {
    let (mut rt, mut app, f, _) = setup();
    click(&mut rt, &mut app, f.agreement);
    assert!(rt.document().checked(f.agreement));
    assert!(rt.document().has_class(f.agreement, "success"));

    click(&mut rt, &mut app, f.agreement);
    assert!(rt.document().has_class(f.agreement, "error"));
    assert_eq!(
        error_text(&rt, f.agreement).as_deref(),
        Some("Необходимо согласие на обработку персональных данных")
    );
}

#[test]
fn input_validation_can_be_disabled() {
    let (mut rt, mut app, f, _) = setup_with(FormOptions::default().validate_on_input(false), Vec::new());
    click(&mut rt, &mut app, f.name);
    type_text(&mut rt, &mut app, "A");
    assert!(!rt.document().has_class(f.name, "error"));
    assert!(!rt.document().has_class(f.name, "success"));
}

#[test]
fn english_catalog() {
    let options = FormOptions::default().messages(MessageCatalog::english());
    let (mut rt, mut app, f, _) = setup_with(options, Vec::new());
    click(&mut rt, &mut app, f.phone);
    type_text(&mut rt, &mut app, "12");
    assert_eq!(error_text(&rt, f.phone).as_deref(), Some("Format: +7 (XXX) XXX-XX-XX"));
}

// ── Phone mask ────────────────────────────────────────────────────────────

#[test]
fn phone_focus_prefills_and_typing_formats() {
    let (mut rt, mut app, f, _) = setup();
    click(&mut rt, &mut app, f.phone);
    assert_eq!(rt.document().value(f.phone), Some("+7 "));

    type_text(&mut rt, &mut app, "9");
    assert_eq!(rt.document().value(f.phone), Some("+7 (9"));
    assert!(rt.document().has_class(f.phone, "error"));

    type_text(&mut rt, &mut app, "123456789");
    assert_eq!(rt.document().value(f.phone), Some("+7 (912) 345-67-89"));
    assert!(rt.document().has_class(f.phone, "success"));
}

#[test]
fn phone_focus_keeps_existing_value() {
    let (mut rt, mut app, f, _) = setup();
    rt.document_mut().set_value(f.phone, "+7 (495");
    click(&mut rt, &mut app, f.phone);
    assert_eq!(rt.document().value(f.phone), Some("+7 (495"));
}

// ── Submission ────────────────────────────────────────────────────────────

#[test]
fn invalid_submit_marks_all_and_scrolls_to_first() {
    let (mut rt, mut app, f, sent) = setup();
    rt.document_mut().set_value(f.company, "Vitrine");
    rt.push_event(DomEvent::new(EventKind::Submit, EventTarget::Node(app.0.form())));
    rt.pump(&mut app);

    let doc = rt.document();
    for field in [f.name, f.email, f.phone, f.message, f.agreement] {
        assert!(doc.has_class(field, "error"));
    }
    assert!(doc.has_class(f.company, "success"));
    assert_eq!(doc.scroll_history(), &[f.name]);
    assert_eq!(app.0.last_outcome(), Some(&SubmitOutcome::Invalid));
    assert!(sent.borrow().is_empty());
}

#[test]
fn successful_submit_sends_resets_and_shows_modal() {
    let (mut rt, mut app, f, sent) = setup();
    fill_valid(&mut rt, &f);
    click(&mut rt, &mut app, f.submit);

    assert_eq!(app.0.last_outcome(), Some(&SubmitOutcome::Sent));
    {
        let sent = sent.borrow();
        assert_eq!(sent.len(), 1);
        let (url, data) = &sent[0];
        assert_eq!(url, "/api/forms/submit");
        assert_eq!(data.get("email"), Some("anna@example.com"));
        assert_eq!(data.get("agreement"), Some("on"));
        let names: Vec<&str> = data.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["name", "company", "email", "phone", "message", "agreement"]);
    }

    let doc = rt.document();
    assert_eq!(doc.value(f.name), Some(""));
    assert!(!doc.checked(f.agreement));
    assert!(!doc.has_class(f.name, "success"));
    assert_eq!(doc.text(f.submit), Some("Send"));
    assert_eq!(doc.attribute(f.submit, "disabled"), None);

    let shown = modals(&rt);
    assert_eq!(shown.len(), 1);
    let body = doc.query(Some(shown[0]), "p").unwrap();
    assert_eq!(doc.text(body), Some("Форма успешно отправлена!"));

    rt.advance(4999.0, &mut app);
    assert_eq!(modals(&rt).len(), 1);
    rt.advance(1.0, &mut app);
    assert!(modals(&rt).is_empty());
    assert_eq!(app.0.open_modals(), 0);
}

#[test]
fn unchecked_checkbox_is_not_submitted() {
    let options = FormOptions::default().rules(RuleSet::new()).submit_url("/api/contact/submit");
    let (mut rt, mut app, f, sent) = setup_with(options, Vec::new());
    rt.document_mut().set_value(f.name, "x");
    click(&mut rt, &mut app, f.submit);

    let sent = sent.borrow();
    assert_eq!(sent[0].0, "/api/contact/submit");
    assert_eq!(sent[0].1.get("agreement"), None);
    assert_eq!(sent[0].1.get("name"), Some("x"));
}

#[test]
fn failed_submit_alerts_and_keeps_values() {
    let (mut rt, mut app, f, _) = setup_with(FormOptions::default(), vec![Err(SubmitError::Status(502))]);
    fill_valid(&mut rt, &f);
    click(&mut rt, &mut app, f.submit);

    assert_eq!(app.0.last_outcome(), Some(&SubmitOutcome::Failed("server answered 502".into())));
    let doc = rt.document();
    assert_eq!(doc.alerts(), [MessageCatalog::russian().submit_failed]);
    assert_eq!(doc.value(f.email), Some("anna@example.com"));
    assert_eq!(doc.text(f.submit), Some("Send"));
    assert_eq!(doc.attribute(f.submit, "disabled"), None);
    assert!(modals(&rt).is_empty());
    assert!(!app.0.is_submitting());
}

#[test]
fn close_button_removes_modal_and_cancels_timer() {
    let (mut rt, mut app, f, _) = setup();
    fill_valid(&mut rt, &f);
    click(&mut rt, &mut app, f.submit);
    let owner = app.0.owner();
    assert_eq!(rt.scheduler().pending_for(owner), 1);

    let close = rt.document().query(Some(modals(&rt)[0]), "button").unwrap();
    assert_eq!(rt.document().text(close), Some("Закрыть"));
    rt.push_event(DomEvent::new(EventKind::Click, EventTarget::Node(close)));
    rt.pump(&mut app);

    assert!(modals(&rt).is_empty());
    assert_eq!(rt.scheduler().pending_for(owner), 0);
}

// ── Teardown ──────────────────────────────────────────────────────────────

#[test]
fn destroy_detaches_and_clears() {
    let (mut rt, mut app, f, _) = setup();
    fill_valid(&mut rt, &f);
    click(&mut rt, &mut app, f.submit);
    rt.document_mut().add_class(f.name, "error");

    let owner = app.0.owner();
    rt.with_ctx(|ctx| app.0.destroy(ctx));
    assert_eq!(rt.listeners().count_for(owner), 0);
    assert_eq!(rt.scheduler().pending_for(owner), 0);
    assert!(modals(&rt).is_empty());
    assert!(!rt.document().has_class(f.name, "error"));

    click(&mut rt, &mut app, f.name);
    type_text(&mut rt, &mut app, "A");
    assert!(!rt.document().has_class(f.name, "error"));

    rt.with_ctx(|ctx| app.0.destroy(ctx));
}
