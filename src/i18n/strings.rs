/// Singular and plural display names of a UCUM time unit
#[derive(Debug, Clone, Copy)]
pub struct UnitNames {
    /// UCUM code as used in FHIR (e.g. "d", "wk")
    pub code: &'static str,
    pub one: &'static str,
    pub other: &'static str,
}

/// All localized fragments used to render dosages for a language
///
/// Templates use `{name}` placeholders that the renderer substitutes.
/// Any placeholder left in the output is treated as a rendering failure.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Frequency / Period ====================
    /// Frequency over a single period unit
    /// Placeholders: {frequency}, {unit}
    pub frequency_every: &'static str,

    /// Frequency over several period units
    /// Placeholders: {frequency}, {period}, {unit}
    pub frequency_every_n: &'static str,

    /// Value range (e.g. "2 to 3")
    /// Placeholders: {low}, {high}
    pub range: &'static str,

    // ==================== Offset / When ====================
    /// Placeholders: {offset}, {when}
    pub offset_when: &'static str,

    // ==================== Bounds / Count ====================
    /// Placeholders: {duration}
    pub bounds_duration: &'static str,

    /// Placeholders: {count}
    pub count: &'static str,

    // ==================== Day / Time ====================
    /// Placeholders: {days}
    pub day_of_week: &'static str,

    /// Placeholders: {times}
    pub time_of_day: &'static str,

    // ==================== Other ====================
    pub as_needed: &'static str,

    /// Conjunction used before the last element of a list
    pub list_and: &'static str,

    /// Connector between successive dosages of one group
    pub then: &'static str,

    // ==================== Vocabularies ====================
    pub units: &'static [UnitNames],

    /// FHIR `EventTiming` code → phrase
    pub when: &'static [(&'static str, &'static str)],

    /// FHIR `days-of-week` code → name
    pub days: &'static [(&'static str, &'static str)],
}

impl LanguageStrings {
    /// Display name of a time unit, singular or plural.
    pub fn unit(&self, code: &str, plural: bool) -> Option<&'static str> {
        self.units
            .iter()
            .find(|u| u.code == code)
            .map(|u| if plural { u.other } else { u.one })
    }

    pub fn when_phrase(&self, code: &str) -> Option<&'static str> {
        lookup(self.when, code)
    }

    pub fn day_name(&self, code: &str) -> Option<&'static str> {
        lookup(self.days, code)
    }

    /// Join items as "a, b and c".
    pub fn join_list(&self, items: &[&str]) -> String {
        match items {
            [] => String::new(),
            [single] => single.to_string(),
            [init @ .., last] => format!("{}{}{}", init.join(", "), self.list_and, last),
        }
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, phrase)| *phrase)
}

/// Time unit codes every language must name
pub const UNIT_CODES: [&str; 7] = ["s", "min", "h", "d", "wk", "mo", "a"];

/// Event timing codes every language must name
pub const WHEN_CODES: [&str; 7] = ["AC", "PC", "C", "HS", "WAKE", "MORN", "NIGHT"];

/// Day codes every language must name
pub const DAY_CODES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    frequency_every: "{frequency} times every {unit}",
    frequency_every_n: "{frequency} times every {period} {unit}",
    range: "{low} to {high}",
    offset_when: "{offset} {when}",
    bounds_duration: "for {duration}",
    count: "{count} times",
    day_of_week: "on {days}",
    time_of_day: "at {times}",
    as_needed: "as required",
    list_and: " and ",
    then: ", then ",
    units: &[
        UnitNames { code: "s", one: "second", other: "seconds" },
        UnitNames { code: "min", one: "minute", other: "minutes" },
        UnitNames { code: "h", one: "hour", other: "hours" },
        UnitNames { code: "d", one: "day", other: "days" },
        UnitNames { code: "wk", one: "week", other: "weeks" },
        UnitNames { code: "mo", one: "month", other: "months" },
        UnitNames { code: "a", one: "year", other: "years" },
    ],
    when: &[
        ("AC", "before meal"),
        ("PC", "after meal"),
        ("C", "during meal"),
        ("HS", "before sleep"),
        ("WAKE", "after waking"),
        ("MORN", "in the morning"),
        ("NIGHT", "at night"),
    ],
    days: &[
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
    ],
};

// ==================== French Strings ====================

pub const FRENCH_STRINGS: LanguageStrings = LanguageStrings {
    frequency_every: "{frequency} fois chaque {unit}",
    frequency_every_n: "{frequency} fois tous les {period} {unit}",
    range: "{low} à {high}",
    offset_when: "{offset} {when}",
    bounds_duration: "pour {duration}",
    count: "{count} fois",
    day_of_week: "le {days}",
    time_of_day: "à {times}",
    as_needed: "si nécessaire",
    list_and: " et ",
    then: ", puis ",
    units: &[
        UnitNames { code: "s", one: "seconde", other: "secondes" },
        UnitNames { code: "min", one: "minute", other: "minutes" },
        UnitNames { code: "h", one: "heure", other: "heures" },
        UnitNames { code: "d", one: "jour", other: "jours" },
        UnitNames { code: "wk", one: "semaine", other: "semaines" },
        UnitNames { code: "mo", one: "mois", other: "mois" },
        UnitNames { code: "a", one: "année", other: "années" },
    ],
    when: &[
        ("AC", "avant le repas"),
        ("PC", "après le repas"),
        ("C", "pendant le repas"),
        ("HS", "avant le coucher"),
        ("WAKE", "après le réveil"),
        ("MORN", "le matin"),
        ("NIGHT", "la nuit"),
    ],
    days: &[
        ("mon", "lundi"),
        ("tue", "mardi"),
        ("wed", "mercredi"),
        ("thu", "jeudi"),
        ("fri", "vendredi"),
        ("sat", "samedi"),
        ("sun", "dimanche"),
    ],
};

// ==================== Dutch Strings ====================

pub const DUTCH_STRINGS: LanguageStrings = LanguageStrings {
    frequency_every: "{frequency} keer elke {unit}",
    frequency_every_n: "{frequency} keer elke {period} {unit}",
    range: "{low} tot {high}",
    offset_when: "{offset} {when}",
    bounds_duration: "gedurende {duration}",
    count: "{count} keer",
    day_of_week: "op {days}",
    time_of_day: "om {times}",
    as_needed: "indien nodig",
    list_and: " en ",
    then: ", dan ",
    units: &[
        UnitNames { code: "s", one: "seconde", other: "seconden" },
        UnitNames { code: "min", one: "minuut", other: "minuten" },
        UnitNames { code: "h", one: "uur", other: "uren" },
        UnitNames { code: "d", one: "dag", other: "dagen" },
        UnitNames { code: "wk", one: "week", other: "weken" },
        UnitNames { code: "mo", one: "maand", other: "maanden" },
        UnitNames { code: "a", one: "jaar", other: "jaren" },
    ],
    when: &[
        ("AC", "voor de maaltijd"),
        ("PC", "na de maaltijd"),
        ("C", "tijdens de maaltijd"),
        ("HS", "voor het slapengaan"),
        ("WAKE", "na het ontwaken"),
        ("MORN", "'s ochtends"),
        ("NIGHT", "'s nachts"),
    ],
    days: &[
        ("mon", "maandag"),
        ("tue", "dinsdag"),
        ("wed", "woensdag"),
        ("thu", "donderdag"),
        ("fri", "vrijdag"),
        ("sat", "zaterdag"),
        ("sun", "zondag"),
    ],
};

// ==================== German Strings ====================

pub const GERMAN_STRINGS: LanguageStrings = LanguageStrings {
    frequency_every: "{frequency} Mal jede {unit}",
    frequency_every_n: "{frequency} Mal alle {period} {unit}",
    range: "{low} bis {high}",
    offset_when: "{offset} {when}",
    bounds_duration: "für {duration}",
    count: "{count} Mal",
    day_of_week: "am {days}",
    time_of_day: "um {times}",
    as_needed: "bei Bedarf",
    list_and: " und ",
    then: ", dann ",
    units: &[
        UnitNames { code: "s", one: "Sekunde", other: "Sekunden" },
        UnitNames { code: "min", one: "Minute", other: "Minuten" },
        UnitNames { code: "h", one: "Stunde", other: "Stunden" },
        UnitNames { code: "d", one: "Tag", other: "Tage" },
        UnitNames { code: "wk", one: "Woche", other: "Wochen" },
        UnitNames { code: "mo", one: "Monat", other: "Monate" },
        UnitNames { code: "a", one: "Jahr", other: "Jahre" },
    ],
    when: &[
        ("AC", "vor den Mahlzeiten"),
        ("PC", "nach den Mahlzeiten"),
        ("C", "während der Mahlzeiten"),
        ("HS", "vor dem Schlafengehen"),
        ("WAKE", "nach dem Aufwachen"),
        ("MORN", "am Morgen"),
        ("NIGHT", "in der Nacht"),
    ],
    days: &[
        ("mon", "Montag"),
        ("tue", "Dienstag"),
        ("wed", "Mittwoch"),
        ("thu", "Donnerstag"),
        ("fri", "Freitag"),
        ("sat", "Samstag"),
        ("sun", "Sonntag"),
    ],
};
