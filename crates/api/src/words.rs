//! Practice vocabulary: everyday words with Telugu and Assamese translations
//! and a Latin-letter pronunciation guide for each.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

/// One vocabulary entry across every supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordEntry {
    pub category: &'static str,
    pub english: &'static str,
    pub telugu: &'static str,
    pub assamese: &'static str,
    pub emoji: &'static str,
    pub telugu_roman: &'static str,
    pub assamese_roman: &'static str,
}

const fn w(
    category: &'static str,
    english: &'static str,
    telugu: &'static str,
    assamese: &'static str,
    emoji: &'static str,
    telugu_roman: &'static str,
    assamese_roman: &'static str,
) -> WordEntry {
    WordEntry {
        category,
        english,
        telugu,
        assamese,
        emoji,
        telugu_roman,
        assamese_roman,
    }
}

/// Categories in display order.
pub const CATEGORIES: &[&str] = &[
    "animals",
    "colors",
    "body_parts",
    "numbers",
    "food",
    "common_objects",
];

const WORDS: &[WordEntry] = &[
    // animals
    w("animals", "cat", "పిల్లి", "মেকুৰী", "🐱", "pilli", "mekuri"),
    w("animals", "dog", "కుక్క", "কুকুৰ", "🐶", "kukka", "kukur"),
    w("animals", "elephant", "ఏనుగు", "হাতী", "🐘", "enugu", "hati"),
    w("animals", "lion", "సింహం", "সিংহ", "🦁", "sinham", "singha"),
    w("animals", "fish", "చేప", "মাছ", "🐟", "chepa", "maas"),
    w("animals", "bird", "పక్షి", "চৰাই", "🐦", "pakshi", "shorai"),
    w("animals", "cow", "ఆవు", "গৰু", "🐄", "aavu", "guru"),
    w("animals", "monkey", "కోతి", "বান্দৰ", "🐒", "koti", "bandor"),
    w("animals", "tiger", "పులి", "বাঘ", "🐯", "puli", "bagh"),
    w("animals", "rabbit", "కుందేలు", "শহাপহু", "🐰", "kundelu", "shohapahu"),
    w("animals", "duck", "బాతు", "হাঁহ", "🦆", "baatu", "haah"),
    w("animals", "frog", "కప్ప", "ভেকুলী", "🐸", "kappa", "bhekuli"),
    // colors
    w("colors", "red", "ఎరుపు", "ৰঙা", "🔴", "erupu", "ronga"),
    w("colors", "blue", "నీలం", "নীলা", "🔵", "neelam", "nila"),
    w("colors", "green", "పచ్చ", "সেউজীয়া", "💚", "pacha", "seujia"),
    w("colors", "yellow", "పసుపు", "হালধীয়া", "💛", "pasupu", "haldhia"),
    w("colors", "pink", "గులాబీ", "গোলাপী", "🌸", "gulabi", "golapi"),
    w("colors", "white", "తెలుపు", "বগা", "⬜", "telupu", "boga"),
    w("colors", "black", "నలుపు", "ক'লা", "⬛", "nalupu", "kola"),
    w("colors", "orange", "నారింజ", "কমলা", "🟠", "narinja", "komola"),
    // body_parts
    w("body_parts", "eye", "కన్ను", "চকু", "👁️", "kannu", "shoku"),
    w("body_parts", "nose", "ముక్కు", "নাক", "👃", "mukku", "naak"),
    w("body_parts", "hand", "చేయి", "হাত", "✋", "cheyi", "haat"),
    w("body_parts", "leg", "కాలు", "ভৰি", "🦵", "kaalu", "bhori"),
    w("body_parts", "ear", "చెవి", "কাণ", "👂", "chevi", "kaan"),
    w("body_parts", "mouth", "నోరు", "মুখ", "👄", "noru", "mukh"),
    w("body_parts", "hair", "జుట్టు", "চুলি", "💇", "juttu", "shuli"),
    w("body_parts", "teeth", "పళ్ళు", "দাঁত", "🦷", "pallu", "daat"),
    // numbers
    w("numbers", "one", "ఒకటి", "এক", "1️⃣", "okati", "ek"),
    w("numbers", "two", "రెండు", "দুই", "2️⃣", "rendu", "dui"),
    w("numbers", "three", "మూడు", "তিনি", "3️⃣", "mudu", "tini"),
    w("numbers", "four", "నాలుగు", "চাৰি", "4️⃣", "nalugu", "shari"),
    w("numbers", "five", "అయిదు", "পাঁচ", "5️⃣", "ayidu", "paansh"),
    w("numbers", "six", "ఆరు", "ছয়", "6️⃣", "aaru", "shoy"),
    w("numbers", "seven", "ఏడు", "সাত", "7️⃣", "edu", "saat"),
    w("numbers", "eight", "ఎనిమిది", "আঠ", "8️⃣", "enimidi", "aath"),
    w("numbers", "nine", "తొమ్మిది", "ন", "9️⃣", "tommidi", "no"),
    w("numbers", "ten", "పది", "দহ", "🔟", "padi", "doh"),
    // food
    w("food", "apple", "ఆపిల్", "আপেল", "🍎", "aapil", "aapel"),
    w("food", "banana", "అరటిపండు", "কল", "🍌", "aratipandu", "kol"),
    w("food", "milk", "పాలు", "গাখীৰ", "🥛", "paalu", "gakheer"),
    w("food", "rice", "అన్నం", "ভাত", "🍚", "annam", "bhat"),
    w("food", "water", "నీళ్ళు", "পানী", "💧", "neellu", "paani"),
    w("food", "mango", "మామిడి", "আম", "🥭", "maamidi", "aam"),
    w("food", "egg", "గుడ్డు", "কণী", "🥚", "guddu", "koni"),
    w("food", "bread", "రొట్టె", "পাউৰুটি", "🍞", "rotte", "pauruti"),
    // common_objects
    w("common_objects", "ball", "బంతి", "বল", "⚽", "banti", "bol"),
    w("common_objects", "house", "ఇల్లు", "ঘৰ", "🏠", "illu", "ghar"),
    w("common_objects", "book", "పుస్తకం", "কিতাপ", "📚", "pustakam", "kitaap"),
    w("common_objects", "tree", "చెట్టు", "গছ", "🌳", "chettu", "gash"),
    w("common_objects", "sun", "సూర్యుడు", "সূৰ্য", "☀️", "suryudu", "surya"),
    w("common_objects", "moon", "చంద్రుడు", "চন্দ্ৰ", "🌙", "chandrudu", "shandra"),
    w("common_objects", "star", "నక్షత్రం", "তৰা", "⭐", "nakshatram", "tora"),
    w("common_objects", "flower", "పువ్వు", "ফুল", "🌸", "puvvu", "phul"),
    w("common_objects", "car", "కారు", "গাড়ী", "🚗", "kaaru", "gaari"),
    w("common_objects", "boat", "పడవ", "নাও", "⛵", "padava", "naao"),
];

impl WordEntry {
    /// The word in `language`, or the English word for languages without a column.
    pub fn translation(&self, language: &str) -> &'static str {
        match language {
            "telugu" => self.telugu,
            "assamese" => self.assamese,
            _ => self.english,
        }
    }

    /// Pronunciation guide for `language`; empty where none exists.
    pub fn romanized(&self, language: &str) -> &'static str {
        match language {
            "telugu" => self.telugu_roman,
            "assamese" => self.assamese_roman,
            _ => "",
        }
    }
}

/// A word picked for the child to say.
#[derive(Debug, Clone, Serialize)]
pub struct PracticeWord {
    pub english: &'static str,
    pub translation: &'static str,
    pub romanized: &'static str,
    pub emoji: &'static str,
    pub language: String,
    pub category: &'static str,
}

/// A word in a progress listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListedWord {
    pub english: &'static str,
    pub translation: &'static str,
    pub emoji: &'static str,
    pub category: &'static str,
}

pub fn is_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}

pub fn all_categories() -> Vec<String> {
    CATEGORIES.iter().map(|c| c.to_string()).collect()
}

pub fn words_in(category: &str) -> impl Iterator<Item = &'static WordEntry> + '_ {
    WORDS.iter().filter(move |w| w.category == category)
}

/// Picks a random word from `category`. An unknown category falls back to a
/// random known one.
pub fn random_word<R: Rng + ?Sized>(rng: &mut R, category: &str, language: &str) -> PracticeWord {
    let category = if is_category(category) {
        category
    } else {
        CATEGORIES.choose(rng).copied().unwrap_or("animals")
    };
    let candidates: Vec<&WordEntry> = words_in(category).collect();
    let entry = candidates.choose(rng).copied().unwrap_or(&WORDS[0]);

    PracticeWord {
        english: entry.english,
        translation: entry.translation(language),
        romanized: entry.romanized(language),
        emoji: entry.emoji,
        language: language.to_string(),
        category: entry.category,
    }
}

/// Every word of the given categories in `language`. Unknown categories are skipped.
pub fn words_for(language: &str, categories: &[String]) -> Vec<ListedWord> {
    categories
        .iter()
        .flat_map(|category| words_in(category))
        .map(|entry| ListedWord {
            english: entry.english,
            translation: entry.translation(language),
            emoji: entry.emoji,
            category: entry.category,
        })
        .collect()
}
