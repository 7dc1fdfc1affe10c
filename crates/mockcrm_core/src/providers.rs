//! Pluggable data providers for the contact generator.
//!
//! The generator never hard-codes locale data. Names, emails and notes come
//! from a [`NameProvider`], phone numbers from a [`PhoneFormatProvider`].
//! Both draw every random value from the generator's RNG, so a seeded
//! generator reproduces the same contacts.
//!
//! [`FrenchLocale`] is the default and implements both.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Source of personal data for generated contacts.
pub trait NameProvider: Send + Sync {
    /// A given name.
    fn first_name(&self, rng: &mut dyn RngCore) -> String;

    /// A family name, formatted as the locale displays it.
    fn last_name(&self, rng: &mut dyn RngCore) -> String;

    /// An email address for the given person.
    fn email(&self, first_name: &str, last_name: &str, rng: &mut dyn RngCore) -> String;

    /// A short free-form note.
    fn notes(&self, rng: &mut dyn RngCore) -> String;
}

/// The five phone number shapes a contact may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneFormat {
    /// Country code followed by nine digits, e.g. `+33612345678`.
    International,
    /// Whatever the locale considers a normal written number.
    Locale,
    /// Leading zero followed by nine digits, e.g. `0612345678`.
    NationalLeadingZero,
    /// Dot-separated pairs, e.g. `06.12.34.56.78`.
    DotGrouped,
    /// Space-separated pairs, e.g. `06 12 34 56 78`.
    SpaceGrouped,
}

impl PhoneFormat {
    /// Every format, in selection order.
    pub const ALL: [PhoneFormat; 5] = [
        PhoneFormat::International,
        PhoneFormat::Locale,
        PhoneFormat::NationalLeadingZero,
        PhoneFormat::DotGrouped,
        PhoneFormat::SpaceGrouped,
    ];
}

/// Source of phone numbers for generated contacts.
pub trait PhoneFormatProvider: Send + Sync {
    /// Renders a random number in the given format.
    fn phone(&self, format: PhoneFormat, rng: &mut dyn RngCore) -> String;

    /// Picks a format uniformly and renders a number in it.
    fn random_phone(&self, rng: &mut dyn RngCore) -> String {
        let format = PhoneFormat::ALL[rng.gen_range(0..PhoneFormat::ALL.len())];
        self.phone(format, rng)
    }
}

const FIRST_NAMES: &[&str] = &[
    "Camille", "Léa", "Manon", "Chloé", "Inès", "Sarah", "Juliette", "Louise", "Emma", "Jade",
    "Hélène", "Margaux", "Élodie", "Lucas", "Hugo", "Louis", "Gabriel", "Arthur", "Jules",
    "Théo", "Nathan", "Raphaël", "Mathis", "Antoine", "Julien", "Nicolas", "Étienne", "François",
    "Benoît", "Jérôme",
];

const LAST_NAMES: &[&str] = &[
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
    "Moreau", "Simon", "Laurent", "Lefèvre", "Michel", "Garcia", "David", "Bertrand", "Roux",
    "Vincent", "Fournier", "Morel", "Girard", "André", "Mercier", "Dupont", "Lambert", "Bonnet",
    "François", "Martinez", "Lefebvre",
];

const FREE_MAIL_DOMAINS: &[&str] = &[
    "orange.fr",
    "free.fr",
    "laposte.net",
    "sfr.fr",
    "gmail.com",
    "hotmail.fr",
    "yahoo.fr",
];

const NOTE_SENTENCES: &[&str] = &[
    "Rencontré au salon VivaTech.",
    "Intéressé par une démo.",
    "Rappeler la semaine prochaine.",
    "Budget validé pour le T3.",
    "Souhaite un devis détaillé.",
    "Contact recommandé par un client.",
    "A téléchargé le livre blanc.",
    "Décideur technique.",
    "Préfère les échanges par email.",
    "En cours d'évaluation.",
];

const MAX_NOTES_CHARS: usize = 100;

/// French-locale provider: French names, free-mail addresses and
/// French-style phone numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrenchLocale;

impl FrenchLocale {
    fn pick(list: &[&str], rng: &mut dyn RngCore) -> String {
        list.choose(rng).copied().unwrap_or_default().to_string()
    }

    fn pair(rng: &mut dyn RngCore) -> u32 {
        rng.gen_range(10..=99)
    }
}

impl NameProvider for FrenchLocale {
    fn first_name(&self, rng: &mut dyn RngCore) -> String {
        Self::pick(FIRST_NAMES, rng)
    }

    fn last_name(&self, rng: &mut dyn RngCore) -> String {
        Self::pick(LAST_NAMES, rng).to_uppercase()
    }

    fn email(&self, first_name: &str, last_name: &str, rng: &mut dyn RngCore) -> String {
        let domain = Self::pick(FREE_MAIL_DOMAINS, rng);
        format!(
            "{}.{}@{}",
            ascii_slug(first_name),
            ascii_slug(last_name),
            domain
        )
    }

    fn notes(&self, rng: &mut dyn RngCore) -> String {
        let sentences = rng.gen_range(1..=3);
        let mut notes = String::new();
        for sentence in NOTE_SENTENCES.choose_multiple(rng, sentences) {
            let extra = if notes.is_empty() { 0 } else { 1 };
            if notes.chars().count() + extra + sentence.chars().count() > MAX_NOTES_CHARS {
                break;
            }
            if extra == 1 {
                notes.push(' ');
            }
            notes.push_str(sentence);
        }
        notes
    }
}

impl PhoneFormatProvider for FrenchLocale {
    fn phone(&self, format: PhoneFormat, rng: &mut dyn RngCore) -> String {
        match format {
            PhoneFormat::International => {
                format!("+33{}", rng.gen_range(100_000_000..=799_999_999u32))
            }
            PhoneFormat::Locale => {
                let area = rng.gen_range(1..=9);
                let (a, b, c, d) = (
                    Self::pair(rng),
                    Self::pair(rng),
                    Self::pair(rng),
                    Self::pair(rng),
                );
                if rng.gen_bool(0.5) {
                    format!("0{} {} {} {} {}", area, a, b, c, d)
                } else {
                    format!("+33 (0){} {} {} {} {}", area, a, b, c, d)
                }
            }
            PhoneFormat::NationalLeadingZero => {
                format!("0{}", rng.gen_range(100_000_000..=799_999_999u32))
            }
            PhoneFormat::DotGrouped => {
                let area = rng.gen_range(1..=9);
                format!(
                    "0{}.{}.{}.{}.{}",
                    area,
                    Self::pair(rng),
                    Self::pair(rng),
                    Self::pair(rng),
                    Self::pair(rng)
                )
            }
            PhoneFormat::SpaceGrouped => {
                let area = rng.gen_range(1..=9);
                format!(
                    "0{} {} {} {} {}",
                    area,
                    Self::pair(rng),
                    Self::pair(rng),
                    Self::pair(rng),
                    Self::pair(rng)
                )
            }
        }
    }
}

/// Lower-cases a name and folds it to an ASCII email local part.
fn ascii_slug(name: &str) -> String {
    name.chars()
        .flat_map(|c| c.to_lowercase())
        .filter_map(|c| match c {
            'à' | 'â' | 'ä' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'î' | 'ï' => Some('i'),
            'ô' | 'ö' => Some('o'),
            'ù' | 'û' | 'ü' => Some('u'),
            'ç' => Some('c'),
            'ÿ' => Some('y'),
            c if c.is_ascii_alphanumeric() => Some(c),
            '-' | '.' => Some('-'),
            _ => None,
        })
        .collect()
}
