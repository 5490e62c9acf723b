//! Porter suffix-stripping stemmer.
//!
//! Implements M.F. Porter's "An algorithm for suffix stripping" (1980) with the extensions
//! commonly shipped by NLTK:
//!
//! * a table of irregular forms ("dying" → "die", "skies" → "sky");
//! * `ies` and `ied` become `ie` in four-letter words ("ties" → "tie");
//! * a final `y` becomes `i` only after a consonant ("money" stays, "happy" → "happi");
//! * `alli` is reduced before the rest of step 2, `fulli` → `ful`, and `logi` → `log`;
//! * a two-letter vowel-consonant stem counts as consonant-vowel-consonant.
//!
//! Words are lowercased first. Words of at most two characters are returned lowercased but
//! otherwise unchanged. Every character other than `a`, `e`, `i`, `o`, `u` (and `y` after a
//! vowel) counts as a consonant, so non-ASCII words are stemmed as well ("cafés" → "café").

/// Porter stemmer.
#[derive(Clone, Copy, Debug, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Creates a new PorterStemmer.
    pub const fn new() -> Self {
        Self
    }

    /// Stems a single word.
    ///
    /// # Arguments
    ///
    /// * `word` - Input word.
    ///
    /// # Returns
    ///
    /// The stemmed word.
    pub fn stem(&self, word: &str) -> String {
        // The table is consulted before lowercasing.
        if let Some(stem) = irregular_form(word) {
            return stem.to_string();
        }
        let lower = word.to_lowercase();
        if word.chars().count() <= 2 {
            return lower;
        }
        let mut w: Vec<char> = lower.chars().collect();
        step1a(&mut w);
        step1b(&mut w);
        step1c(&mut w);
        step2(&mut w);
        step3(&mut w);
        step4(&mut w);
        step5a(&mut w);
        step5b(&mut w);
        w.into_iter().collect()
    }
}

fn irregular_form(word: &str) -> Option<&'static str> {
    let stem = match word {
        "sky" | "skies" => "sky",
        "dying" => "die",
        "lying" => "lie",
        "tying" => "tie",
        "news" => "news",
        "inning" | "innings" => "inning",
        "outing" | "outings" => "outing",
        "canning" | "cannings" => "canning",
        "howe" => "howe",
        "proceed" => "proceed",
        "exceed" => "exceed",
        "succeed" => "succeed",
        _ => return None,
    };
    Some(stem)
}

/// `(suffix, replacement, condition on the remaining stem)`
type Rule = (&'static str, &'static str, fn(&[char]) -> bool);

fn is_consonant(w: &[char], i: usize) -> bool {
    match w[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences.
fn measure(w: &[char]) -> usize {
    (1..w.len())
        .filter(|&i| !is_consonant(w, i - 1) && is_consonant(w, i))
        .count()
}

fn positive_measure(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn measure_gt_1(stem: &[char]) -> bool {
    measure(stem) > 1
}

fn always(_: &[char]) -> bool {
    true
}

fn contains_vowel(w: &[char]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(w: &[char]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

fn ends_cvc(w: &[char]) -> bool {
    let n = w.len();
    (n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], 'w' | 'x' | 'y'))
        || (n == 2 && !is_consonant(w, 0) && is_consonant(w, 1))
}

fn ends_with(w: &[char], suffix: &str) -> bool {
    let n = suffix.len();
    w.len() >= n && w[w.len() - n..].iter().copied().eq(suffix.chars())
}

fn replace_suffix(w: &mut Vec<char>, suffix_len: usize, replacement: &str) {
    w.truncate(w.len() - suffix_len);
    w.extend(replacement.chars());
}

/// Applies the first rule whose suffix matches. Later rules are not tried even if its condition
/// fails.
fn apply_rules(w: &mut Vec<char>, rules: &[Rule]) {
    for &(suffix, replacement, condition) in rules {
        if ends_with(w, suffix) {
            if condition(&w[..w.len() - suffix.len()]) {
                replace_suffix(w, suffix.len(), replacement);
            }
            return;
        }
    }
}

/// Plurals.
fn step1a(w: &mut Vec<char>) {
    if w.len() == 4 && ends_with(w, "ies") {
        replace_suffix(w, 3, "ie");
        return;
    }
    apply_rules(
        w,
        &[
            ("sses", "ss", always),
            ("ies", "i", always),
            ("ss", "ss", always),
            ("s", "", always),
        ],
    );
}

/// -eed, -ed and -ing.
fn step1b(w: &mut Vec<char>) {
    if ends_with(w, "ied") {
        let replacement = if w.len() == 4 { "ie" } else { "i" };
        replace_suffix(w, 3, replacement);
        return;
    }
    if ends_with(w, "eed") {
        if positive_measure(&w[..w.len() - 3]) {
            w.pop();
        }
        return;
    }
    let suffix_len = if ends_with(w, "ed") {
        2
    } else if ends_with(w, "ing") {
        3
    } else {
        return;
    };
    if !contains_vowel(&w[..w.len() - suffix_len]) {
        return;
    }
    w.truncate(w.len() - suffix_len);
    if ends_with(w, "at") || ends_with(w, "bl") || ends_with(w, "iz") {
        w.push('e');
    } else if ends_double_consonant(w) {
        if !matches!(w.last(), Some('l' | 's' | 'z')) {
            w.pop();
        }
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push('e');
    }
}

/// Terminal y to i after a consonant.
fn step1c(w: &mut Vec<char>) {
    let n = w.len();
    if ends_with(w, "y") && n - 1 > 1 && is_consonant(w, n - 2) {
        w[n - 1] = 'i';
    }
}

const STEP2_RULES: &[Rule] = &[
    ("ational", "ate", positive_measure),
    ("tional", "tion", positive_measure),
    ("enci", "ence", positive_measure),
    ("anci", "ance", positive_measure),
    ("izer", "ize", positive_measure),
    ("bli", "ble", positive_measure),
    ("alli", "al", positive_measure),
    ("entli", "ent", positive_measure),
    ("eli", "e", positive_measure),
    ("ousli", "ous", positive_measure),
    ("ization", "ize", positive_measure),
    ("ation", "ate", positive_measure),
    ("ator", "ate", positive_measure),
    ("alism", "al", positive_measure),
    ("iveness", "ive", positive_measure),
    ("fulness", "ful", positive_measure),
    ("ousness", "ous", positive_measure),
    ("aliti", "al", positive_measure),
    ("iviti", "ive", positive_measure),
    ("biliti", "ble", positive_measure),
    ("fulli", "ful", positive_measure),
];

/// Double suffixes to single ones.
fn step2(w: &mut Vec<char>) {
    if ends_with(w, "alli") && positive_measure(&w[..w.len() - 4]) {
        replace_suffix(w, 4, "al");
        step2(w);
        return;
    }
    // The `l` of `logi` stays with the stem when measuring, so "geology" reduces too.
    if ends_with(w, "logi") {
        if positive_measure(&w[..w.len() - 3]) {
            w.pop();
        }
        return;
    }
    apply_rules(w, STEP2_RULES);
}

/// -ic-, -full, -ness etc.
fn step3(w: &mut Vec<char>) {
    apply_rules(
        w,
        &[
            ("icate", "ic", positive_measure),
            ("ative", "", positive_measure),
            ("alize", "al", positive_measure),
            ("iciti", "ic", positive_measure),
            ("ical", "ic", positive_measure),
            ("ful", "", positive_measure),
            ("ness", "", positive_measure),
        ],
    );
}

fn ion_stem(stem: &[char]) -> bool {
    measure(stem) > 1 && matches!(stem.last(), Some('s' | 't'))
}

/// Drops -ant, -ence etc. when the stem has more than one syllable.
fn step4(w: &mut Vec<char>) {
    apply_rules(
        w,
        &[
            ("al", "", measure_gt_1),
            ("ance", "", measure_gt_1),
            ("ence", "", measure_gt_1),
            ("er", "", measure_gt_1),
            ("ic", "", measure_gt_1),
            ("able", "", measure_gt_1),
            ("ible", "", measure_gt_1),
            ("ant", "", measure_gt_1),
            ("ement", "", measure_gt_1),
            ("ment", "", measure_gt_1),
            ("ent", "", measure_gt_1),
            ("ion", "", ion_stem),
            ("ou", "", measure_gt_1),
            ("ism", "", measure_gt_1),
            ("ate", "", measure_gt_1),
            ("iti", "", measure_gt_1),
            ("ous", "", measure_gt_1),
            ("ive", "", measure_gt_1),
            ("ize", "", measure_gt_1),
        ],
    );
}

/// Final -e.
fn step5a(w: &mut Vec<char>) {
    if w.last() != Some(&'e') {
        return;
    }
    let stem = &w[..w.len() - 1];
    let m = measure(stem);
    if m > 1 || (m == 1 && !ends_cvc(stem)) {
        w.pop();
    }
}

/// -ll to -l.
fn step5b(w: &mut Vec<char>) {
    if ends_with(w, "ll") && measure(&w[..w.len() - 1]) > 1 {
        w.pop();
    }
}
