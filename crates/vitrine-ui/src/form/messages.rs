use std::collections::BTreeMap;

use super::rules::Violation;

/// User-facing strings for one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageCatalog {
    pub locale: &'static str,
    fields: BTreeMap<(String, Violation), String>,
    fallback: BTreeMap<Violation, String>,
    pub success_title: String,
    pub success_message: String,
    pub sending_label: String,
    pub submit_failed: String,
    pub close_label: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::russian()
    }
}

impl MessageCatalog {
    fn empty(locale: &'static str) -> Self {
        Self {
            locale,
            fields: BTreeMap::new(),
            fallback: BTreeMap::new(),
            success_title: String::new(),
            success_message: String::new(),
            sending_label: String::new(),
            submit_failed: String::new(),
            close_label: String::new(),
        }
    }

    pub fn russian() -> Self {
        use Violation::*;
        let mut c = Self::empty("ru");
        c.success_title = "Спасибо за заявку!".into();
        c.success_message = "Форма успешно отправлена!".into();
        c.sending_label = "Отправка...".into();
        c.submit_failed =
            "Произошла ошибка при отправке формы. Пожалуйста, попробуйте позже.".into();
        c.close_label = "Закрыть".into();

        c.set_fallback(Required, "Заполните это поле");
        c.set_fallback(MinLength, "Слишком короткое значение");
        c.set_fallback(MaxLength, "Слишком длинное значение");
        c.set_fallback(Pattern, "Неверный формат");

        c.set("name", Required, "Введите ваше имя");
        c.set("name", MinLength, "Имя должно содержать минимум 2 символа");
        c.set("name", MaxLength, "Имя не должно превышать 50 символов");
        c.set("name", Pattern, "Имя может содержать только буквы, пробелы и дефисы");
        c.set("company", Required, "Введите название компании");
        c.set("company", MaxLength, "Название компании не должно превышать 100 символов");
        c.set("email", Required, "Введите email адрес");
        c.set("email", Pattern, "Введите корректный email адрес");
        c.set("phone", Required, "Введите номер телефона");
        c.set("phone", Pattern, "Формат: +7 (XXX) XXX-XX-XX");
        c.set("message", Required, "Введите ваш запрос");
        c.set("message", MinLength, "Запрос должен содержать минимум 10 символов");
        c.set("message", MaxLength, "Запрос не должен превышать 1000 символов");
        c.set("agreement", Required, "Необходимо согласие на обработку персональных данных");
        c
    }

    pub fn english() -> Self {
        use Violation::*;
        let mut c = Self::empty("en");
        c.success_title = "Thank you for your request!".into();
        c.success_message = "The form has been sent.".into();
        c.sending_label = "Sending...".into();
        c.submit_failed = "Something went wrong while sending the form. Please try again later.".into();
        c.close_label = "Close".into();

        c.set_fallback(Required, "This field is required");
        c.set_fallback(MinLength, "Value is too short");
        c.set_fallback(MaxLength, "Value is too long");
        c.set_fallback(Pattern, "Invalid format");

        c.set("name", Required, "Enter your name");
        c.set("name", MinLength, "Name must be at least 2 characters");
        c.set("name", MaxLength, "Name must not exceed 50 characters");
        c.set("name", Pattern, "Name may contain only letters, spaces and hyphens");
        c.set("company", Required, "Enter your company name");
        c.set("company", MaxLength, "Company name must not exceed 100 characters");
        c.set("email", Required, "Enter your email address");
        c.set("email", Pattern, "Enter a valid email address");
        c.set("phone", Required, "Enter your phone number");
        c.set("phone", Pattern, "Format: +7 (XXX) XXX-XX-XX");
        c.set("message", Required, "Enter your request");
        c.set("message", MinLength, "Request must be at least 10 characters");
        c.set("message", MaxLength, "Request must not exceed 1000 characters");
        c.set("agreement", Required, "Consent to personal data processing is required");
        c
    }

    /// `ru` or `en`; anything else is `None`.
    pub fn for_locale(locale: &str) -> Option<Self> {
        match locale.to_ascii_lowercase().as_str() {
            "ru" => Some(Self::russian()),
            "en" => Some(Self::english()),
            _ => None,
        }
    }

    pub fn set(&mut self, field: &str, violation: Violation, message: impl Into<String>) {
        self.fields.insert((field.to_string(), violation), message.into());
    }

    pub fn set_fallback(&mut self, violation: Violation, message: impl Into<String>) {
        self.fallback.insert(violation, message.into());
    }

    /// Field-specific message, else the locale's generic one.
    pub fn message(&self, field: &str, violation: Violation) -> &str {
        self.fields
            .get(&(field.to_string(), violation))
            .or_else(|| self.fallback.get(&violation))
            .map(String::as_str)
            .unwrap_or_default()
    }
}
