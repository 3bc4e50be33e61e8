use std::str::FromStr;

use strum::EnumCount;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, strum_macros::EnumCount)]
#[repr(usize)]
pub enum Template {
    Start,
    Help,
    NoSender,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, strum_macros::EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    /// Resolves an IETF tag such as `ru` or `ru-RU` by its primary subtag.
    pub fn from_code(code: Option<&str>) -> Self {
        code.and_then(|c| c.split(|ch| ch == '-' || ch == '_').next())
            .and_then(|primary| Language::from_str(primary.trim()).ok())
            .unwrap_or_default()
    }
    pub fn text(self, template: Template) -> &'static str {
        self.templates()[template as usize]
    }
    fn templates(self) -> &'static [&'static str; Template::COUNT] {
        match self {
            Language::En => &EN,
            Language::Ru => &RU,
        }
    }
}

const EN: [&str; Template::COUNT] = [
    "Welcome to AdMarket! You are registered. Open the marketplace to list your channels or buy ad posts.",
    "Commands:\n/start - register and open the marketplace\n/help - show this help",
    "Cannot tell who sent this message",
];

const RU: [&str; Template::COUNT] = [
    "Добро пожаловать в AdMarket! Ты зарегистрирован. Открой маркетплейс, чтобы добавить свои каналы или купить рекламу.",
    "Команды:\n/start - регистрация и вход в маркетплейс\n/help - помощь",
    "Не понимаю, от кого это сообщение",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_primary_subtag() {
        assert_eq!(Language::from_code(Some("ru")), Language::Ru);
        assert_eq!(Language::from_code(Some("ru-RU")), Language::Ru);
        assert_eq!(Language::from_code(Some("RU_ru")), Language::Ru);
        assert_eq!(Language::from_code(Some("en-GB")), Language::En);
    }

    #[test]
    fn falls_back_to_english() {
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::from_code(None), Language::En);
        assert_eq!(Language::from_code(Some("")), Language::En);
        assert_eq!(Language::from_code(Some("de")), Language::En);
    }

    #[test]
    fn every_language_has_every_template() {
        for lang in [Language::En, Language::Ru] {
            for template in [Template::Start, Template::Help, Template::NoSender] {
                assert!(!lang.text(template).is_empty());
            }
        }
        assert_ne!(Language::Ru.text(Template::Start), Language::En.text(Template::Start));
    }
}
