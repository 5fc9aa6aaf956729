use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};

const LANGUAGE_FILE_NAME: &str = "language.json";

/// Display languages the message catalog ships with. The stored data is
/// language-neutral; only rendering goes through this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Tr,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" => Some(Language::En),
            "tr" => Some(Language::Tr),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Tr,
            Language::Tr => Language::En,
        }
    }
}

/// Looks up a message by its dotted key. Unknown Turkish keys fall back
/// to English; an unknown key renders as itself rather than panicking.
pub fn text<'a>(lang: Language, key: &'a str) -> &'a str {
    match lang {
        Language::En => en_text(key),
        Language::Tr => tr_text(key),
    }
}

fn en_text(key: &str) -> &str {
    match key {
        "home.smokedCount" => "Smoked today:",
        "home.remaining" => "Remaining:",
        "home.overLimit" => "Over the limit by {count}!",
        "home.limit" => "Daily limit:",
        "home.timeSinceLast" => "Time since last cigarette",
        "home.recorded" => "Recorded at {time}.",
        "home.removed" => "Entry removed.",
        "home.noSuchKey" => "No entry with that key.",
        "home.emptyList" => "No cigarettes recorded today.",
        "home.invalidLimit" => "Please enter a valid positive number.",
        "home.limitSet" => "Daily limit set to {count}.",
        "rollover.done" => "Day closed out: {count} smoked, limit {limit}.",
        "history.title" => "History",
        "history.empty" => "No history yet.",
        "history.deleted" => "History entry deleted.",
        "history.noSuchId" => "No history entry with that id.",
        "history.smokedCount" => "Smoked:",
        "history.limit" => "Limit:",
        "history.overLimit" => "Over by {count}",
        "history.times" => "Times",
        "lang.current" => "Display language: {code}",
        "lang.unknown" => "Unknown language code (expected en or tr).",
        "error.storage" => "Something went wrong while saving your data.",
        _ => key,
    }
}

fn tr_text(key: &str) -> &str {
    match key {
        "home.smokedCount" => "Bugün içilen:",
        "home.remaining" => "Kalan:",
        "home.overLimit" => "Limit {count} adet aşıldı!",
        "home.limit" => "Günlük limit:",
        "home.timeSinceLast" => "Son sigaradan bu yana geçen süre",
        "home.recorded" => "{time} olarak kaydedildi.",
        "home.removed" => "Kayıt silindi.",
        "home.noSuchKey" => "Bu anahtarla bir kayıt yok.",
        "home.emptyList" => "Bugün sigara kaydedilmedi.",
        "home.invalidLimit" => "Lütfen geçerli bir pozitif sayı girin.",
        "home.limitSet" => "Günlük limit {count} olarak ayarlandı.",
        "rollover.done" => "Gün kapatıldı: {count} içildi, limit {limit}.",
        "history.title" => "Geçmiş",
        "history.empty" => "Henüz geçmiş yok.",
        "history.deleted" => "Geçmiş kaydı silindi.",
        "history.noSuchId" => "Bu kimlikle bir geçmiş kaydı yok.",
        "history.smokedCount" => "İçilen:",
        "history.limit" => "Limit:",
        "history.overLimit" => "{count} adet aşıldı",
        "history.times" => "Saatler",
        "lang.current" => "Görüntüleme dili: {code}",
        "lang.unknown" => "Bilinmeyen dil kodu (en veya tr bekleniyor).",
        "error.storage" => "Verileriniz kaydedilirken bir sorun oluştu.",
        _ => en_text(key),
    }
}

const WEEKDAYS_EN: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const WEEKDAYS_TR: [&str; 7] = [
    "Pazar",
    "Pazartesi",
    "Salı",
    "Çarşamba",
    "Perşembe",
    "Cuma",
    "Cumartesi",
];
const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const MONTHS_TR: [&str; 12] = [
    "Ocak",
    "Şubat",
    "Mart",
    "Nisan",
    "Mayıs",
    "Haziran",
    "Temmuz",
    "Ağustos",
    "Eylül",
    "Ekim",
    "Kasım",
    "Aralık",
];

/// Renders a stored calendar date as "3 June Tuesday" / "3 Haziran Salı".
/// The date itself never changes; only its rendering follows the language.
pub fn format_date(lang: Language, date: NaiveDate) -> String {
    let weekday = date.weekday().num_days_from_sunday() as usize;
    let month = date.month0() as usize;
    match lang {
        Language::En => format!("{} {} {}", date.day(), MONTHS_EN[month], WEEKDAYS_EN[weekday]),
        Language::Tr => format!("{} {} {}", date.day(), MONTHS_TR[month], WEEKDAYS_TR[weekday]),
    }
}

fn language_file(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    let mut path = match base_dir {
        Some(dir) => dir,
        None => {
            let home_dir =
                dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
            home_dir.join(".pufftrack")
        }
    };
    fs::create_dir_all(&path)?;
    path.push(LANGUAGE_FILE_NAME);
    Ok(path)
}

/// Reads the persisted preference; English when absent or unreadable.
pub fn load_language(base_dir: Option<PathBuf>) -> Language {
    let Ok(path) = language_file(base_dir) else {
        return Language::En;
    };
    if !path.exists() {
        return Language::En;
    }
    File::open(&path)
        .ok()
        .and_then(|file| serde_json::from_reader::<_, String>(BufReader::new(file)).ok())
        .and_then(|code| Language::from_code(&code))
        .unwrap_or(Language::En)
}

pub fn save_language(base_dir: Option<PathBuf>, lang: Language) -> Result<()> {
    let path = language_file(base_dir)?;
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, lang.code())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_turkish_keys_fall_back_to_english() {
        assert!(!text(Language::Tr, "error.storage").is_empty());
        assert_eq!(
            text(Language::Tr, "no.such.key"),
            text(Language::En, "no.such.key")
        );
    }

    #[test]
    fn dates_render_in_the_active_language() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert_eq!(format_date(Language::En, date), "3 June Tuesday");
        assert_eq!(format_date(Language::Tr, date), "3 Haziran Salı");
    }

    #[test]
    fn language_preference_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();

        assert_eq!(load_language(Some(base.clone())), Language::En);
        save_language(Some(base.clone()), Language::Tr).unwrap();
        assert_eq!(load_language(Some(base)), Language::Tr);
    }
}
