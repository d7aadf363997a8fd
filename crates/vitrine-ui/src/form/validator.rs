use vitrine_engine::core::{Dispatch, HostCtx, TimerFired};
use vitrine_engine::dom::{NodeId, Surface};
use vitrine_engine::runtime::{EventKind, EventTarget, ListenerId, OwnerId, TimerHandle};

use crate::component::Component;
use crate::error::ConfigError;
use crate::target::Target;

use super::mask::{self, PHONE_PREFIX};
use super::messages::MessageCatalog;
use super::rules::{FieldValue, RuleSet, Violation};
use super::transport::{FormData, FormTransport};

const ERROR_MESSAGE_CLASS: &str = "error-message";
const MODAL_CLASS: &str = "form-success-modal";

#[derive(Debug, Clone)]
pub struct FormOptions {
    pub validate_on_blur: bool,
    pub validate_on_input: bool,
    pub validate_on_submit: bool,
    pub scroll_to_error: bool,
    pub submit_url: String,
    /// Overrides the catalog's success text.
    pub success_message: Option<String>,
    pub error_class: String,
    pub success_class: String,
    /// Overrides the catalog's in-flight submit label.
    pub sending_label: Option<String>,
    pub messages: MessageCatalog,
    /// `None` uses [`RuleSet::defaults`].
    pub rules: Option<RuleSet>,
    pub success_modal_ms: f64,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_on_blur: true,
            validate_on_input: true,
            validate_on_submit: true,
            scroll_to_error: true,
            submit_url: "/api/forms/submit".to_string(),
            success_message: None,
            error_class: "error".to_string(),
            success_class: "success".to_string(),
            sending_label: None,
            messages: MessageCatalog::default(),
            rules: None,
            success_modal_ms: 5000.0,
        }
    }
}

impl FormOptions {
    pub fn submit_url(mut self, url: impl Into<String>) -> Self {
        self.submit_url = url.into();
        self
    }

    pub fn messages(mut self, catalog: MessageCatalog) -> Self {
        self.messages = catalog;
        self
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn success_message(mut self, text: impl Into<String>) -> Self {
        self.success_message = Some(text.into());
        self
    }

    pub fn sending_label(mut self, text: impl Into<String>) -> Self {
        self.sending_label = Some(text.into());
        self
    }

    pub fn validate_on_blur(mut self, on: bool) -> Self {
        self.validate_on_blur = on;
        self
    }

    pub fn validate_on_input(mut self, on: bool) -> Self {
        self.validate_on_input = on;
        self
    }

    pub fn validate_on_submit(mut self, on: bool) -> Self {
        self.validate_on_submit = on;
        self
    }

    pub fn scroll_to_error(mut self, on: bool) -> Self {
        self.scroll_to_error = on;
        self
    }

    pub fn success_modal_ms(mut self, ms: f64) -> Self {
        self.success_modal_ms = ms;
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Trigger {
    FormInput,
    FieldBlur,
    CheckboxChange,
    PhoneInput,
    PhoneFocus,
    Submit,
    ModalClose(NodeId),
}

#[derive(Debug, Clone)]
enum Initial {
    Text(String),
    Checked(bool),
}

#[derive(Debug)]
struct Modal {
    node: NodeId,
    timer: TimerHandle,
    close: ListenerId,
}

/// How the last submit attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Invalid,
    Sent,
    Failed(String),
}

/// Validates a form's named fields and sends it through a [`FormTransport`].
pub struct FormValidator {
    owner: OwnerId,
    form: NodeId,
    options: FormOptions,
    rules: RuleSet,
    transport: Box<dyn FormTransport>,
    initial: Vec<(NodeId, Initial)>,
    listeners: Vec<(ListenerId, Trigger)>,
    modals: Vec<Modal>,
    submitting: bool,
    last_outcome: Option<SubmitOutcome>,
    alive: bool,
}

impl std::fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormValidator")
            .field("owner", &self.owner)
            .field("form", &self.form)
            .field("submit_url", &self.options.submit_url)
            .field("submitting", &self.submitting)
            .field("alive", &self.alive)
            .finish_non_exhaustive()
    }
}

impl FormValidator {
    pub fn create(
        ctx: &mut HostCtx<'_>,
        form: impl Into<Target>,
        mut options: FormOptions,
        transport: Box<dyn FormTransport>,
    ) -> Result<Self, ConfigError> {
        let form = form.into().resolve(ctx.surface)?;
        let rules = match options.rules.take() {
            Some(rules) => rules,
            None => RuleSet::defaults()?,
        };

        let initial = ctx
            .surface
            .query_all(Some(form), "[name]")
            .into_iter()
            .map(|n| {
                let state = if is_checkbox(ctx.surface, n) {
                    Initial::Checked(ctx.surface.checked(n))
                } else {
                    Initial::Text(ctx.surface.value(n).unwrap_or_default().to_string())
                };
                (n, state)
            })
            .collect();

        let owner = ctx.new_owner();
        let mut validator = Self {
            owner,
            form,
            options,
            rules,
            transport,
            initial,
            listeners: Vec::new(),
            modals: Vec::new(),
            submitting: false,
            last_outcome: None,
            alive: true,
        };
        validator.attach_listeners(ctx);

        log::debug!(
            "form validator {:?} on node #{} -> {}",
            owner,
            form.index(),
            validator.options.submit_url
        );
        Ok(validator)
    }

    fn attach_listeners(&mut self, ctx: &mut HostCtx<'_>) {
        let form = self.form;
        let mut wanted = Vec::new();

        if self.options.validate_on_submit {
            wanted.push((form, EventKind::Submit, Trigger::Submit));
        }
        if self.options.validate_on_input {
            wanted.push((form, EventKind::Input, Trigger::FormInput));
        }
        let ruled: Vec<NodeId> = ctx
            .surface
            .query_all(Some(form), "[name]")
            .into_iter()
            .filter(|n| ctx.surface.attribute(*n, "name").is_some_and(|name| self.rules.contains(name)))
            .collect();
        if self.options.validate_on_blur {
            wanted.extend(ruled.iter().map(|n| (*n, EventKind::Blur, Trigger::FieldBlur)));
        }
        for checkbox in ctx.surface.query_all(Some(form), "input[type=checkbox]") {
            wanted.push((checkbox, EventKind::Change, Trigger::CheckboxChange));
        }
        if let Some(phone) = ctx.surface.query(Some(form), "input[name=phone]") {
            wanted.push((phone, EventKind::Input, Trigger::PhoneInput));
            wanted.push((phone, EventKind::Focus, Trigger::PhoneFocus));
        }

        for (node, kind, trigger) in wanted {
            let id = ctx.listen(EventTarget::Node(node), kind, self.owner);
            self.listeners.push((id, trigger));
        }
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_outcome(&self) -> Option<&SubmitOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn open_modals(&self) -> usize {
        self.modals.len()
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Validates one control and updates its display. Controls without a
    /// name or without a rule are valid and left untouched.
    pub fn validate_field(&self, surface: &mut dyn Surface, field: NodeId) -> bool {
        let Some(name) = surface.attribute(field, "name").map(str::to_string) else {
            return true;
        };
        if !self.rules.contains(&name) {
            return true;
        }

        let result = if is_checkbox(surface, field) {
            self.rules.check(&name, FieldValue::Checkbox(surface.checked(field)))
        } else {
            let value = surface.value(field).unwrap_or_default().to_string();
            self.rules.check(&name, FieldValue::Text(&value))
        };

        match result {
            Ok(()) => {
                self.show_success(surface, field);
                true
            }
            Err(violation) => {
                self.show_error(surface, field, &name, violation);
                false
            }
        }
    }

    /// Validates every ruled control; all of them are visited.
    pub fn validate_form(&self, surface: &mut dyn Surface) -> bool {
        let mut valid = true;
        for field in surface.query_all(Some(self.form), "[name]") {
            valid &= self.validate_field(surface, field);
        }
        valid
    }

    fn show_error(&self, surface: &mut dyn Surface, field: NodeId, name: &str, violation: Violation) {
        surface.remove_class(field, &self.options.success_class);
        surface.add_class(field, &self.options.error_class);

        let Some(parent) = surface.parent(field) else {
            return;
        };
        let slot = match surface.query(Some(parent), ".error-message") {
            Some(slot) => slot,
            None => {
                let slot = surface.create_element("div");
                surface.add_class(slot, ERROR_MESSAGE_CLASS);
                surface.append_child(parent, slot);
                slot
            }
        };
        let message = self.options.messages.message(name, violation).to_string();
        surface.set_text(slot, &message);
        surface.remove_class(slot, "hidden");
        surface.add_class(slot, "show");
    }

    fn show_success(&self, surface: &mut dyn Surface, field: NodeId) {
        surface.remove_class(field, &self.options.error_class);
        surface.add_class(field, &self.options.success_class);
        if let Some(slot) = surface.parent(field).and_then(|p| surface.query(Some(p), ".error-message")) {
            hide_message(surface, slot);
        }
    }

    /// Drops every success/error mark and hides every message.
    pub fn clear_validation(&self, surface: &mut dyn Surface) {
        for field in surface.query_all(Some(self.form), "[name]") {
            surface.remove_class(field, &self.options.error_class);
            surface.remove_class(field, &self.options.success_class);
        }
        for slot in surface.query_all(Some(self.form), ".error-message") {
            hide_message(surface, slot);
        }
    }

    // ── Submission ────────────────────────────────────────────────────────

    /// Runs the submit flow. Returns `None` if a submission is in flight.
    pub fn submit(&mut self, ctx: &mut HostCtx<'_>) -> Option<SubmitOutcome> {
        if !self.alive || self.submitting {
            return None;
        }

        if !self.validate_form(ctx.surface) {
            if self.options.scroll_to_error {
                let first = ctx.surface.query(Some(self.form), &format!(".{}", self.options.error_class));
                if let Some(field) = first {
                    ctx.surface.scroll_into_view(field);
                }
            }
            log::debug!("form {:?}: submit blocked by validation", self.owner);
            return self.finish(SubmitOutcome::Invalid);
        }

        self.submitting = true;
        let button = ctx.surface.query(Some(self.form), "[type=submit]");
        let label = button.and_then(|b| ctx.surface.text(b)).unwrap_or_default().to_string();
        if let Some(b) = button {
            let sending = self.sending_label().to_string();
            ctx.surface.set_attribute(b, "disabled", "disabled");
            ctx.surface.set_text(b, &sending);
        }

        let data = self.form_data(ctx.surface);
        let outcome = match self.transport.submit(&self.options.submit_url, &data) {
            Ok(()) => {
                log::info!("form {:?}: sent {} fields to {}", self.owner, data.len(), self.options.submit_url);
                self.open_success_modal(ctx);
                self.reset(ctx.surface);
                self.clear_validation(ctx.surface);
                SubmitOutcome::Sent
            }
            Err(e) => {
                log::error!("form {:?}: submission to {} failed: {e}", self.owner, self.options.submit_url);
                let alert = self.options.messages.submit_failed.clone();
                ctx.surface.alert(&alert);
                SubmitOutcome::Failed(e.to_string())
            }
        };

        self.submitting = false;
        if let Some(b) = button {
            ctx.surface.remove_attribute(b, "disabled");
            ctx.surface.set_text(b, &label);
        }
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: SubmitOutcome) -> Option<SubmitOutcome> {
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    fn sending_label(&self) -> &str {
        self.options
            .sending_label
            .as_deref()
            .unwrap_or(&self.options.messages.sending_label)
    }

    /// Named controls in document order; buttons are skipped and unchecked
    /// checkboxes contribute nothing.
    pub fn form_data(&self, surface: &dyn Surface) -> FormData {
        let mut data = FormData::new();
        for field in surface.query_all(Some(self.form), "[name]") {
            if surface.tag(field) == Some("button") || surface.attribute(field, "disabled").is_some() {
                continue;
            }
            if matches!(surface.attribute(field, "type"), Some("submit" | "button" | "reset")) {
                continue;
            }
            let Some(name) = surface.attribute(field, "name") else {
                continue;
            };
            if is_checkbox(surface, field) {
                if surface.checked(field) {
                    let value = surface.attribute(field, "value").unwrap_or("on");
                    data.append(name, value);
                }
            } else {
                data.append(name, surface.value(field).unwrap_or_default());
            }
        }
        data
    }

    /// Restores every named control to its value at construction.
    pub fn reset(&self, surface: &mut dyn Surface) {
        for (node, state) in &self.initial {
            match state {
                Initial::Text(v) => surface.set_value(*node, v),
                Initial::Checked(c) => surface.set_checked(*node, *c),
            }
        }
    }

    fn open_success_modal(&mut self, ctx: &mut HostCtx<'_>) {
        let catalog = &self.options.messages;
        let message = self.options.success_message.as_deref().unwrap_or(&catalog.success_message);
        let (title, message, close_label) =
            (catalog.success_title.clone(), message.to_string(), catalog.close_label.clone());

        let s = &mut *ctx.surface;
        let modal = s.create_element("div");
        s.add_class(modal, MODAL_CLASS);
        s.set_attribute(modal, "role", "dialog");
        let heading = s.create_element("h3");
        s.set_text(heading, &title);
        s.append_child(modal, heading);
        let body = s.create_element("p");
        s.set_text(body, &message);
        s.append_child(modal, body);
        let close = s.create_element("button");
        s.set_attribute(close, "type", "button");
        s.add_class(close, "form-success-close");
        s.set_text(close, &close_label);
        s.append_child(modal, close);
        let root = s.root();
        s.append_child(root, modal);

        let close = ctx.listen(EventTarget::Node(close), EventKind::Click, self.owner);
        self.listeners.push((close, Trigger::ModalClose(modal)));
        let timer = ctx.set_timeout(self.owner, self.options.success_modal_ms);
        self.modals.push(Modal { node: modal, timer, close });
    }

    fn close_modal(&mut self, ctx: &mut HostCtx<'_>, index: usize) {
        let modal = self.modals.remove(index);
        ctx.clear_timeout(modal.timer);
        ctx.unlisten(modal.close);
        self.listeners.retain(|(id, _)| *id != modal.close);
        ctx.surface.remove(modal.node);
    }

    fn apply_phone_mask(&self, surface: &mut dyn Surface, field: NodeId) {
        let raw = surface.value(field).unwrap_or_default().to_string();
        if let Some(formatted) = mask::format_phone(&raw) {
            surface.set_value(field, &formatted);
        }
    }

    pub fn destroy(&mut self, ctx: &mut HostCtx<'_>) {
        if !self.alive {
            return;
        }
        while !self.modals.is_empty() {
            self.close_modal(ctx, 0);
        }
        for (id, _) in self.listeners.drain(..) {
            ctx.unlisten(id);
        }
        self.clear_validation(ctx.surface);
        self.alive = false;
        log::debug!("form validator {:?} destroyed", self.owner);
    }
}

impl Component for FormValidator {
    fn owner(&self) -> OwnerId {
        self.owner
    }

    fn handle_event(&mut self, ctx: &mut HostCtx<'_>, dispatch: &Dispatch) {
        if !self.alive {
            return;
        }
        let Some(trigger) = self
            .listeners
            .iter()
            .find(|(id, _)| *id == dispatch.listener)
            .map(|(_, t)| *t)
        else {
            return;
        };
        let target = dispatch.event.target_node();

        match trigger {
            Trigger::FormInput | Trigger::FieldBlur | Trigger::CheckboxChange => {
                if let Some(field) = target {
                    self.validate_field(ctx.surface, field);
                }
            }
            Trigger::PhoneInput => {
                if let Some(field) = target {
                    self.apply_phone_mask(ctx.surface, field);
                }
            }
            Trigger::PhoneFocus => {
                if let Some(field) = target {
                    if ctx.surface.value(field).unwrap_or_default().is_empty() {
                        ctx.surface.set_value(field, PHONE_PREFIX);
                    }
                }
            }
            Trigger::Submit => {
                self.submit(ctx);
            }
            Trigger::ModalClose(node) => {
                if let Some(i) = self.modals.iter().position(|m| m.node == node) {
                    self.close_modal(ctx, i);
                }
            }
        }
    }

    fn handle_timer(&mut self, ctx: &mut HostCtx<'_>, timer: TimerFired) {
        if let Some(i) = self.modals.iter().position(|m| m.timer == timer.handle) {
            self.close_modal(ctx, i);
        }
    }

    fn destroy(&mut self, ctx: &mut HostCtx<'_>) {
        FormValidator::destroy(self, ctx);
    }
}

fn is_checkbox(surface: &dyn Surface, node: NodeId) -> bool {
    surface.tag(node) == Some("input")
        && surface
            .attribute(node, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
}

fn hide_message(surface: &mut dyn Surface, slot: NodeId) {
    surface.remove_class(slot, "show");
    surface.add_class(slot, "hidden");
}
