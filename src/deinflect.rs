// EDICT-Search Deinflection
// Reduces conjugated verbs and adjectives to their dictionary forms

use crate::kana::is_ascii_romaji;
use crate::romanization::RomanizationEnum;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::OnceLock;

/// Maximum number of rule applications chained for one candidate
const MAX_DEPTH: usize = 8;

/// Inflection categories a rule undoes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// -nai, -anai
    Negative,
    /// -masu and friends
    Polite,
    /// -ta, -da
    Past,
    /// -te, -de
    Te,
    /// -eru (godan), -rareru (ichidan)
    Potential,
    /// -areru, -rareru
    Passive,
    /// -aseru, -saseru
    Causative,
    /// -ou, -you
    Volitional,
    /// -ro
    Imperative,
    /// -eba, -tara
    Conditional,
    /// -tai
    Desire,
    /// Irregular suru verb
    Suru,
    /// Irregular kuru verb
    Kuru,
    /// i-adjective forms
    Adjective,
    /// -te iru continuous
    Progressive,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single suffix replacement, in Hepburn romaji
#[derive(Debug, Clone)]
pub struct DeinflectRule {
    /// Suffix of the inflected form
    pub inflected: String,
    /// Replacement suffix
    pub base: String,
    /// What the rule undoes
    pub kind: RuleKind,
    /// Whether the replacement yields a dictionary form (false for
    /// intermediate steps such as -mashita → -masu)
    pub to_dictionary: bool,
    /// Irregular rules match the complete word
    pub irregular: bool,
}

impl DeinflectRule {
    fn new(inflected: &str, base: &str, kind: RuleKind, to_dictionary: bool) -> Self {
        Self {
            inflected: inflected.to_string(),
            base: base.to_string(),
            kind,
            to_dictionary,
            irregular: false,
        }
    }

    fn irregular(inflected: &str, base: &str, kind: RuleKind) -> Self {
        Self {
            irregular: true,
            ..Self::new(inflected, base, kind, true)
        }
    }

    /// Apply the rule, returning the rewritten word when the suffix matches
    ///
    /// A rule never consumes the whole word unless it is an irregular-verb
    /// rule, whose inflected suffix is the complete verb.
    pub fn apply(&self, word: &str) -> Option<String> {
        let stem = word.strip_suffix(self.inflected.as_str())?;
        if stem.is_empty() && !self.irregular {
            return None;
        }
        Some(format!("{}{}", stem, self.base))
    }
}

/// One possible dictionary form of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deinflection {
    /// Dictionary form, in Hepburn romaji
    pub form: String,
    /// Rules applied, outermost inflection first
    pub rules: Vec<RuleKind>,
}

/// Godan rows: dictionary ending, a/i/e/o stems, te and ta endings
struct GodanRow {
    u: &'static str,
    a: &'static str,
    i: &'static str,
    e: &'static str,
    o: &'static str,
    te: &'static str,
    ta: &'static str,
}

const GODAN_ROWS: &[GodanRow] = &[
    GodanRow { u: "u", a: "wa", i: "i", e: "e", o: "o", te: "tte", ta: "tta" },
    GodanRow { u: "ku", a: "ka", i: "ki", e: "ke", o: "ko", te: "ite", ta: "ita" },
    GodanRow { u: "gu", a: "ga", i: "gi", e: "ge", o: "go", te: "ide", ta: "ida" },
    GodanRow { u: "su", a: "sa", i: "shi", e: "se", o: "so", te: "shite", ta: "shita" },
    GodanRow { u: "tsu", a: "ta", i: "chi", e: "te", o: "to", te: "tte", ta: "tta" },
    GodanRow { u: "nu", a: "na", i: "ni", e: "ne", o: "no", te: "nde", ta: "nda" },
    GodanRow { u: "bu", a: "ba", i: "bi", e: "be", o: "bo", te: "nde", ta: "nda" },
    GodanRow { u: "mu", a: "ma", i: "mi", e: "me", o: "mo", te: "nde", ta: "nda" },
    GodanRow { u: "ru", a: "ra", i: "ri", e: "re", o: "ro", te: "tte", ta: "tta" },
];

/// Intermediate steps that bring a form back to a simpler inflection
const INTERMEDIATE: &[(&str, &str, RuleKind)] = &[
    ("mashita", "masu", RuleKind::Polite),
    ("masen", "masu", RuleKind::Polite),
    ("masendeshita", "masu", RuleKind::Polite),
    ("mashou", "masu", RuleKind::Polite),
    ("nakatta", "nai", RuleKind::Past),
    ("nakute", "nai", RuleKind::Te),
    ("naide", "nai", RuleKind::Te),
    ("nakereba", "nai", RuleKind::Conditional),
    ("takatta", "tai", RuleKind::Past),
    ("takunai", "tai", RuleKind::Negative),
    ("tara", "ta", RuleKind::Conditional),
    ("dara", "da", RuleKind::Conditional),
    ("teiru", "te", RuleKind::Progressive),
    ("deiru", "de", RuleKind::Progressive),
    ("teita", "te", RuleKind::Progressive),
    ("deita", "de", RuleKind::Progressive),
];

/// Ichidan endings, all reducing to -ru
const ICHIDAN: &[(&str, RuleKind)] = &[
    ("nai", RuleKind::Negative),
    ("masu", RuleKind::Polite),
    ("te", RuleKind::Te),
    ("ta", RuleKind::Past),
    ("tai", RuleKind::Desire),
    ("rareru", RuleKind::Passive),
    ("saseru", RuleKind::Causative),
    ("you", RuleKind::Volitional),
    ("ro", RuleKind::Imperative),
    ("reba", RuleKind::Conditional),
];

const SURU: &[&str] = &[
    "shinai", "shimasu", "shite", "shita", "shiyou", "shitai", "shiro", "sureba", "sareru",
    "saseru", "dekiru",
];

const KURU: &[&str] = &[
    "konai", "kimasu", "kite", "kita", "koyou", "kitai", "koi", "kureba", "korareru",
    "kosaseru",
];

/// Adjective endings, all reducing to -i
const ADJECTIVE: &[&str] = &["kunai", "katta", "kute", "kereba"];

/// The full deinflection rule table, built once
pub fn rules() -> &'static [DeinflectRule] {
    static RULES: OnceLock<Vec<DeinflectRule>> = OnceLock::new();
    RULES.get_or_init(build_rules)
}

fn build_rules() -> Vec<DeinflectRule> {
    let mut rules = Vec::new();

    for &(inflected, base, kind) in INTERMEDIATE {
        rules.push(DeinflectRule::new(inflected, base, kind, false));
    }

    for row in GODAN_ROWS {
        let a = row.a;
        let i = row.i;
        let e = row.e;
        rules.push(DeinflectRule::new(&format!("{a}nai"), row.u, RuleKind::Negative, true));
        rules.push(DeinflectRule::new(&format!("{i}masu"), row.u, RuleKind::Polite, true));
        rules.push(DeinflectRule::new(&format!("{i}tai"), row.u, RuleKind::Desire, true));
        rules.push(DeinflectRule::new(row.te, row.u, RuleKind::Te, true));
        rules.push(DeinflectRule::new(row.ta, row.u, RuleKind::Past, true));
        rules.push(DeinflectRule::new(&format!("{e}ru"), row.u, RuleKind::Potential, true));
        rules.push(DeinflectRule::new(&format!("{a}reru"), row.u, RuleKind::Passive, true));
        rules.push(DeinflectRule::new(&format!("{a}seru"), row.u, RuleKind::Causative, true));
        rules.push(DeinflectRule::new(&format!("{e}ba"), row.u, RuleKind::Conditional, true));
        rules.push(DeinflectRule::new(&format!("{}u", row.o), row.u, RuleKind::Volitional, true));
    }

    // iku has an irregular te/ta form
    rules.push(DeinflectRule::irregular("itte", "iku", RuleKind::Te));
    rules.push(DeinflectRule::irregular("itta", "iku", RuleKind::Past));

    for &(inflected, kind) in ICHIDAN {
        rules.push(DeinflectRule::new(inflected, "ru", kind, true));
    }

    for inflected in SURU {
        rules.push(DeinflectRule::irregular(inflected, "suru", RuleKind::Suru));
    }
    for inflected in KURU {
        rules.push(DeinflectRule::irregular(inflected, "kuru", RuleKind::Kuru));
    }

    for inflected in ADJECTIVE {
        rules.push(DeinflectRule::new(inflected, "i", RuleKind::Adjective, true));
    }

    rules
}

/// Deinflect a Hepburn romaji word
///
/// Every matching rule is applied and the results are deinflected again,
/// breadth first, so layered forms such as *tabesasenakatta* resolve through
/// their intermediate steps. Only dictionary forms are reported, in discovery
/// order and without duplicates. Negative forms ending in -nai are never
/// reported. The input itself is reported when no rule matched, or when it
/// ends in -ru and may already be a dictionary form.
///
/// # Examples
/// ```
/// # use edict_search::deinflect::deinflect;
/// let forms: Vec<String> = deinflect("tabenai").into_iter().map(|d| d.form).collect();
/// assert_eq!(forms, vec!["taberu", "tabu"]);
/// ```
pub fn deinflect(romaji: &str) -> Vec<Deinflection> {
    deinflect_within(romaji, MAX_DEPTH)
}

/// Breadth-first deinflection applying at most `max_depth` rules in a chain
fn deinflect_within(romaji: &str, max_depth: usize) -> Vec<Deinflection> {
    let word = romaji.trim().to_lowercase();
    if word.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<Deinflection> = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut reported: FxHashSet<String> = FxHashSet::default();
    let mut queue: VecDeque<(String, Vec<RuleKind>)> = VecDeque::new();

    seen.insert(word.clone());
    queue.push_back((word.clone(), Vec::new()));
    let mut any_rule_applied = false;

    while let Some((current, chain)) = queue.pop_front() {
        if chain.len() >= max_depth {
            continue;
        }

        for rule in rules() {
            let Some(next) = rule.apply(&current) else {
                continue;
            };
            any_rule_applied = true;

            let mut next_chain = chain.clone();
            next_chain.push(rule.kind);

            if rule.to_dictionary && !next.ends_with("nai") && reported.insert(next.clone()) {
                results.push(Deinflection {
                    form: next.clone(),
                    rules: next_chain.clone(),
                });
            }

            if seen.insert(next.clone()) {
                queue.push_back((next, next_chain));
            }
        }
    }

    if (!any_rule_applied || word.ends_with("ru")) && !reported.contains(&word) {
        results.insert(
            0,
            Deinflection {
                form: word,
                rules: Vec::new(),
            },
        );
    }

    results
}

/// Deinflect input written in any romanization system (or in kana) and
/// return the hiragana of every candidate dictionary form
///
/// # Examples
/// ```
/// # use edict_search::deinflect::deinflect_to_kana;
/// # use edict_search::RomanizationEnum;
/// let mut forms = deinflect_to_kana("tabenai", RomanizationEnum::Hepburn);
/// forms.sort();
/// assert_eq!(forms, vec!["たぶ", "たべる"]);
/// ```
pub fn deinflect_to_kana(text: &str, romanization: RomanizationEnum) -> Vec<String> {
    let hepburn = to_hepburn(text, romanization);
    let hiragana = RomanizationEnum::Hepburn;
    let mut forms: Vec<String> = Vec::new();
    for d in deinflect(&hepburn) {
        let kana = hiragana.to_hiragana(&d.form);
        if !forms.contains(&kana) {
            forms.push(kana);
        }
    }
    forms
}

/// Normalise romaji in `romanization`, or kana, to Hepburn romaji
pub fn to_hepburn(text: &str, romanization: RomanizationEnum) -> String {
    let text = text.trim();
    if is_ascii_romaji(text) && romanization == RomanizationEnum::Hepburn {
        return text.to_lowercase();
    }
    let kana = romanization.to_hiragana(text);
    RomanizationEnum::Hepburn.to_romaji(&kana)
}

/// Human-readable description of the rules applied, innermost last
pub fn describe(deinflection: &Deinflection) -> String {
    if deinflection.rules.is_empty() {
        return "dictionary form".to_string();
    }
    deinflection
        .rules
        .iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(" ← ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms(word: &str) -> Vec<String> {
        deinflect(word).into_iter().map(|d| d.form).collect()
    }

    #[test]
    fn test_rule_apply() {
        let rule = DeinflectRule::new("nai", "ru", RuleKind::Negative, true);
        assert_eq!(rule.apply("tabenai"), Some("taberu".to_string()));
        assert_eq!(rule.apply("taberu"), None);
        assert_eq!(rule.apply("nai"), None);

        let suru = DeinflectRule::irregular("shinai", "suru", RuleKind::Suru);
        assert_eq!(suru.apply("shinai"), Some("suru".to_string()));
    }

    #[test]
    fn test_ichidan_negative() {
        let mut result = forms("tabenai");
        result.sort();
        assert_eq!(result, vec!["taberu", "tabu"]);
    }

    #[test]
    fn test_godan_negative() {
        let result = forms("kakanai");
        assert!(result.contains(&"kaku".to_string()));
    }

    #[test]
    fn test_polite_past_chain() {
        let result = deinflect("tabemashita");
        let taberu = result.iter().find(|d| d.form == "taberu").unwrap();
        assert_eq!(taberu.rules, vec![RuleKind::Polite, RuleKind::Polite]);
    }

    #[test]
    fn test_godan_te_forms() {
        assert!(forms("nonde").contains(&"nomu".to_string()));
        assert!(forms("kaite").contains(&"kaku".to_string()));
        assert!(forms("oyoide").contains(&"oyogu".to_string()));
        assert!(forms("hanashita").contains(&"hanasu".to_string()));
        assert!(forms("matte").contains(&"matsu".to_string()));
        assert!(forms("itta").contains(&"iku".to_string()));
    }

    #[test]
    fn test_negative_past() {
        let result = forms("ikanakatta");
        assert!(result.contains(&"iku".to_string()));
        assert!(!result.iter().any(|f| f.ends_with("nai")));
    }

    #[test]
    fn test_irregular_verbs() {
        assert!(forms("shimasu").contains(&"suru".to_string()));
        assert!(forms("benkyoushita").contains(&"benkyousuru".to_string()));
        assert!(forms("konai").contains(&"kuru".to_string()));
        assert!(forms("kimashita").contains(&"kuru".to_string()));
    }

    #[test]
    fn test_adjectives() {
        assert!(forms("takakunai").contains(&"takai".to_string()));
        assert!(forms("takakatta").contains(&"takai".to_string()));
        assert!(forms("takakunakatta").contains(&"takai".to_string()));
    }

    #[test]
    fn test_stacked_form_resolves_without_duplicates() {
        let result = deinflect("tabesaseraretakunakatta");

        let mut unique: Vec<&str> = result.iter().map(|d| d.form.as_str()).collect();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), result.len());

        let taberu = result.iter().find(|d| d.form == "taberu").unwrap();
        assert_eq!(
            taberu.rules,
            vec![
                RuleKind::Past,
                RuleKind::Negative,
                RuleKind::Desire,
                RuleKind::Passive,
                RuleKind::Causative
            ]
        );
        assert!(result.iter().all(|d| d.rules.len() <= MAX_DEPTH));
    }

    #[test]
    fn test_depth_limit_keeps_shallow_forms() {
        let word = "tabesaseraretakunakatta";
        let shallow = deinflect_within(word, 2);
        let full = deinflect(word);

        assert!(!shallow.is_empty());
        assert!(shallow.iter().all(|d| d.rules.len() <= 2));
        assert!(!shallow.iter().any(|d| d.form == "taberu"));
        for d in &shallow {
            assert!(full.contains(d), "{} lost at full depth", d.form);
        }
    }

    #[test]
    fn test_repeated_suffixes_terminate() {
        for word in ["tabemashitatatata", "nakattanakattanakatta", "teiruteiruteiru"] {
            let result = deinflect(word);
            let mut unique: Vec<&str> = result.iter().map(|d| d.form.as_str()).collect();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), result.len(), "{}", word);
        }
    }

    #[test]
    fn test_dictionary_form_kept() {
        assert_eq!(forms("nomu"), vec!["nomu"]);
        let result = forms("taberu");
        assert_eq!(result[0], "taberu");
        assert!(result.contains(&"tabu".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert!(deinflect("").is_empty());
        assert!(deinflect("   ").is_empty());
    }

    #[test]
    fn test_kana_output() {
        let result = deinflect_to_kana("tabemasen", RomanizationEnum::Hepburn);
        assert!(result.contains(&"たべる".to_string()));
    }

    #[test]
    fn test_non_hepburn_input() {
        // Nihon-shiki "hanasita" is Hepburn "hanashita"
        let result = deinflect_to_kana("hanasita", RomanizationEnum::NihonShiki);
        assert!(result.contains(&"はなす".to_string()));
    }

    #[test]
    fn test_kana_input() {
        let result = deinflect_to_kana("たべない", RomanizationEnum::Hepburn);
        assert!(result.contains(&"たべる".to_string()));
    }

    #[test]
    fn test_describe() {
        let d = Deinflection {
            form: "taberu".to_string(),
            rules: vec![RuleKind::Past, RuleKind::Negative],
        };
        assert_eq!(describe(&d), "Past ← Negative");
    }
}
