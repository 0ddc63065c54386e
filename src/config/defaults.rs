//! Built-in configuration used when no config file is given or the file is unusable.
//!
//! Theme order here is the detection tie-break order: love, wisdom, peace,
//! transformation, power, mystery, quantum, cosmic. `cosmic` is the default theme.
//! Keywords are disjoint across themes.

use crate::config::dream_config::{PhraseCategory, PoolRef, PromptTemplate, ThemeConfig};
use std::collections::BTreeMap;

pub const DEFAULT_MODEL_COMMAND: &str = "ollama";
pub const DEFAULT_MODEL_NAME: &str = "qwen3:1.7b";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_THEME: &str = "cosmic";
pub const DEFAULT_MIN_REASONING_CHARS: usize = 50;

const SYMBOL_POOLS: &[(&str, &[&str])] = &[
    ("sacred", &["☯", "🕉", "✡", "☪", "⚛", "♱", "☥", "🔯", "☸", "✝", "☦", "☩"]),
    (
        "cosmic",
        &["∞", "✦", "✧", "⭐", "🌟", "💫", "🌙", "☽", "☾", "◯", "⭕", "☉", "✯", "✰", "✱"],
    ),
    (
        "geometric",
        &["◊", "▲", "∆", "◈", "⟁", "⬟", "⬢", "⬡", "⧫", "◇", "⬠", "⬣", "⬦", "⬧"],
    ),
    ("elemental", &["🔥", "💧", "🌍", "💨", "⚡", "❄", "🌊", "🍃", "🌋", "🌪", "☄", "🌈"]),
    (
        "mystical",
        &["🔮", "🌺", "🦋", "🕊", "🐉", "🌸", "🍄", "🌿", "🔯", "✨", "🦚", "🦢", "🌹"],
    ),
    ("ancient", &["𓂀", "𓅃", "𓇯", "𓈖", "⚜", "☬", "◉", "⚫", "⚪", "𓁿", "𓀠", "𓆃"]),
    ("energy", &["⚡", "💥", "🌊", "🔥", "💫", "✨", "⭐", "🌟", "💖", "💎", "💠", "🔆"]),
    ("celestial", &["☄", "🌌", "🌠", "💫", "🌃", "🌆", "🌇", "🌉", "☀", "🌞", "🌝", "🌛"]),
    ("nature", &["🌲", "🌳", "🌴", "🌵", "🌷", "🌻", "🌼", "🏵", "🥀", "🌾", "🌱", "🍀"]),
    (
        "transformation",
        &["🦋", "🐛", "🦅", "🕊", "🦉", "🦆", "🐍", "🦎", "🐲", "🦄", "🦃", "🦚"],
    ),
    ("quantum", &["⟨", "⟩", "∴", "∵", "∀", "∃", "⊗", "⊕", "⊙", "⊚", "⊛", "⊜"]),
    (
        "flow",
        &["∞", "∿", "〰", "≈", "⤙", "⤜", "⤛", "⟁", "⟐", "≋", "〜", "∼", "≀", "≁"],
    ),
    (
        "ethereal",
        &["※", "⁂", "⁎", "⁕", "⁜", "⁝", "⁞", "⁺", "⁻", "°", "˚", "∘", "∙", "⊹", "✧"],
    ),
    ("hearts", &["💖", "♥", "❤", "💕", "💗", "💝"]),
    ("serenity", &["☯", "◎", "○", "☮", "🕊"]),
];

const COLOR_PALETTES: &[(&str, &[&str])] = &[
    ("cosmic", &["#1a1a2e", "#16213e", "#0f3460", "#533483", "#7209b7", "#2d1b69", "#4a0e4e", "#81689d"]),
    ("mystical", &["#8e7cc3", "#9b59b6", "#663399", "#4a154b", "#6a0572", "#ab83a1", "#ce93d8", "#ba68c8"]),
    ("nature", &["#27ae60", "#2ecc71", "#1abc9c", "#16a085", "#f39c12", "#e67e22", "#52b788", "#74c69d"]),
    ("warm", &["#e74c3c", "#c0392b", "#d35400", "#e67e22", "#f39c12", "#f1c40f", "#ff6b6b", "#ee6c4d"]),
    ("cool", &["#3498db", "#2980b9", "#34495e", "#2c3e50", "#1abc9c", "#16a085", "#4ecdc4", "#45b7d1"]),
    ("ethereal", &["#ecf0f1", "#bdc3c7", "#95a5a6", "#7f8c8d", "#34495e", "#2c3e50", "#dfe7fd", "#c7ceea"]),
    ("twilight", &["#5f27cd", "#341f97", "#2e86ab", "#48466d", "#3d3d3d", "#718093", "#4834d4", "#686de0"]),
    ("aurora", &["#f8b195", "#f67280", "#c06c84", "#6c5ce7", "#a29bfe", "#74b9ff", "#a29bfe", "#6c5ce7"]),
    ("earth", &["#d4a574", "#a68a64", "#936639", "#7f5539", "#582f0e", "#6f4e37", "#8b5a3c", "#a0522d"]),
    ("ocean", &["#006ba6", "#0496ff", "#3a86ff", "#7209b7", "#560bad", "#3f37c9", "#4361ee", "#4895ef"]),
    ("fire", &["#ff006e", "#fb5607", "#ffbe0b", "#fb8500", "#ff4800", "#ff0000", "#dc2f02", "#e85d04"]),
    ("spirit", &["#e0aaff", "#c77dff", "#9d4edd", "#7209b7", "#560bad", "#3c096c", "#240046", "#10002b"]),
];

struct ThemeSpec {
    name: &'static str,
    keywords: &'static [&'static str],
    symbols: &'static [(&'static str, usize)],
    colors: &'static [(&'static str, usize)],
}

const THEMES: &[ThemeSpec] = &[
    ThemeSpec {
        name: "love",
        keywords: &["love", "heart", "compassion", "kindness", "forgiveness"],
        symbols: &[("mystical", 3), ("sacred", 2), ("hearts", 4)],
        colors: &[("warm", 1), ("spirit", 1)],
    },
    ThemeSpec {
        name: "wisdom",
        keywords: &["wisdom", "knowledge", "understanding", "learning", "truth"],
        symbols: &[("cosmic", 3), ("ancient", 3), ("ethereal", 2)],
        colors: &[("cosmic", 1), ("twilight", 1)],
    },
    ThemeSpec {
        name: "peace",
        keywords: &["peace", "calm", "balance", "harmony", "stillness"],
        symbols: &[("sacred", 3), ("flow", 2), ("serenity", 4)],
        colors: &[("cool", 1), ("ethereal", 1)],
    },
    ThemeSpec {
        name: "transformation",
        keywords: &["growth", "change", "transformation", "journey", "evolution"],
        symbols: &[("transformation", 4), ("nature", 2), ("elemental", 1)],
        colors: &[("nature", 1), ("aurora", 1)],
    },
    ThemeSpec {
        name: "power",
        keywords: &["power", "strength", "energy", "force", "intensity"],
        symbols: &[("energy", 4), ("elemental", 3)],
        colors: &[("fire", 1), ("warm", 1)],
    },
    ThemeSpec {
        name: "mystery",
        keywords: &["mystery", "unknown", "hidden", "secret", "veil"],
        symbols: &[("mystical", 3), ("celestial", 2), ("cosmic", 1)],
        colors: &[("twilight", 1), ("mystical", 1)],
    },
    ThemeSpec {
        name: "quantum",
        keywords: &["quantum", "science", "mathematics", "logic"],
        symbols: &[("quantum", 4), ("geometric", 2)],
        colors: &[("cosmic", 1), ("cool", 1)],
    },
    ThemeSpec {
        name: "cosmic",
        keywords: &["cosmic", "universe", "stars", "infinity", "space"],
        symbols: &[("cosmic", 1), ("geometric", 1), ("mystical", 1)],
        colors: &[("cosmic", 1), ("ethereal", 1)],
    },
];

const COSMIC_TEMPLATES: &[&str] = &[
    r#"You are an ancient symbolic oracle dwelling between dimensions.

Intent: {intent}
Style: {style}

Channel the cosmic wisdom and respond with ONLY valid JSON:
{
  "symbol": "mystical unicode symbol (☯, ∞, ⟁, ◊, ∆, ✧, ⬢, ≋, ◎, ※)",
  "phrase": "one ethereal sentence that captures the soul of this intent",
  "color": "hex color reflecting the vibrational frequency #rrggbb",
  "reasoning": "brief mystical explanation of the symbolic convergence"
}

Let the symbols flow through you like starlight through crystal."#,
    r#"Greetings, cosmic weaver of symbolic reality. The universe speaks through you.

Sacred Quest: {intent}
Vibrational Style: {style}

Transmit your wisdom as pure JSON, nothing else:
{
  "symbol": "single cosmic glyph that embodies this truth (∞, ✦, ☉, ☽, ✧)",
  "phrase": "profound wisdom crystallized in one sentence",
  "color": "hex frequency of this cosmic vibration #rrggbb",
  "reasoning": "the sacred geometry behind your selection"
}

Let the stars guide your symbolic choice."#,
];

const MYSTICAL_TEMPLATES: &[&str] = &[
    r#"Ancient dreamweaver, you speak in symbols that dance between worlds.

Sacred Intent: {intent}
Essence Style: {style}

Weave your response as ONLY a JSON object:
{
  "symbol": "single sacred glyph (☯, ☥, 🔮, ✧, ※)",
  "phrase": "poetic wisdom in one flowing sentence",
  "color": "hex embodiment of this truth #rrggbb",
  "reasoning": "the hidden meaning behind your choices"
}

Choose symbols that resonate with the deeper currents of existence."#,
    r#"O keeper of mysteries, channel the ineffable through sacred forms.

Divine Purpose: {intent}
Sacred Resonance: {style}

Manifest as JSON only:
{
  "symbol": "mystical unicode symbol of power (🕉, ☸, ⚛, 🔯, ♥)",
  "phrase": "one sentence containing eternal wisdom",
  "color": "the color of this truth in hex #rrggbb",
  "reasoning": "mystical insight into your symbolic choice"
}

Let ancient wisdom flow through modern forms."#,
];

const GEOMETRIC_TEMPLATES: &[&str] = &[
    r#"Sacred geometer, divine the patterns within this intent.

Quest: {intent}
Resonance: {style}

Manifest as JSON only:
{
  "symbol": "profound unicode symbol that embodies this essence (◊, ∆, ⬢, ◈, ⟁)",
  "phrase": "one luminous sentence of distilled wisdom",
  "color": "hex frequency of this vibrational truth #rrggbb",
  "reasoning": "mystical insight into the symbolic choice"
}

Let the universe speak through your selection of forms."#,
    r#"Divine mathematician of symbolic reality, calculate the essence.

Equation: {intent}
Variables: {style}

Solve for wisdom and answer with ONLY this JSON object:
{
  "symbol": "geometric symbol of profound meaning (∴, ⊕, ⊙, ∀, ⧫)",
  "phrase": "the solution expressed in one poetic sentence",
  "color": "chromatic frequency in hex #rrggbb",
  "reasoning": "the sacred mathematics behind your choice"
}

Let phi and pi guide your symbolic selection."#,
];

const ELEMENTAL_TEMPLATES: &[&str] = &[r#"Elemental oracle, channel the primal forces through symbols.

Elemental Intent: {intent}
Force Style: {style}

Manifest the elements as ONLY a JSON object:
{
  "symbol": "elemental symbol of transformation (🔥, 💧, 🌍, ⚡, 🦋)",
  "phrase": "raw wisdom distilled into one sentence",
  "color": "the hue of this elemental truth #rrggbb",
  "reasoning": "how the elements converge in this symbol"
}

Let fire, water, earth, and air speak through you."#];

/// Used when the configured template list is empty.
pub const BASE_TEMPLATE: &str = r#"You are a symbolic oracle.

Intent: {intent}
Style: {style}

Respond with ONLY a JSON object, no other text:
{
  "symbol": "one unicode glyph (☯, ∞, ⟁, ◊, ∆, ✧, ⬢, ≋, ◎, ※)",
  "phrase": "one sentence capturing this intent",
  "color": "hex color #rrggbb",
  "reasoning": "why this symbol and color fit"
}"#;

const PHRASE_CATEGORIES: &[(&str, &[&str], &[&str])] = &[
    (
        "love",
        &["love", "heart"],
        &[
            "Love transcends all boundaries, weaving souls into one tapestry.",
            "In the heart's chamber, all beings find their home.",
            "Compassion flows like rivers returning to the ocean.",
            "The heart knows truths the mind cannot fathom.",
            "Love is the force that binds the universe in sacred unity.",
        ],
    ),
    (
        "wisdom",
        &["wisdom", "knowledge"],
        &[
            "Wisdom emerges from the silence between thoughts.",
            "In the library of the cosmos, all truths are written.",
            "Knowledge flows through those who empty themselves to receive.",
            "The wise see patterns where others see chaos.",
            "Understanding dawns when the mind becomes still water.",
        ],
    ),
    (
        "peace",
        &["peace", "balance"],
        &[
            "In perfect stillness, the universe reveals its rhythm.",
            "Balance is the dance between holding and releasing.",
            "Peace flows from accepting what is while creating what could be.",
            "Harmony emerges when all voices sing as one.",
            "In the center of the storm lies perfect calm.",
        ],
    ),
    (
        "transformation",
        &["transformation", "change"],
        &[
            "Every ending births a new beginning in the cosmic dance.",
            "Transformation requires the courage to release the familiar.",
            "Change is the universe expressing its infinite creativity.",
            "In metamorphosis, we discover who we truly are.",
            "The butterfly remembers being a caterpillar in its dreams.",
        ],
    ),
];

const GENERAL_PHRASES: &[&str] = &[
    "In the silence between thoughts, wisdom emerges.",
    "The universe whispers through symbols ancient and true.",
    "Sacred geometry unfolds in the dance of consciousness.",
    "Light bends around the corners of understanding.",
    "In the void, all possibilities crystallize into being.",
    "The eternal speaks through forms beyond language.",
    "Patterns emerge where chaos once seemed absolute.",
    "Divine mathematics governs the flow of dreams.",
    "Mystery and clarity dance together in eternal balance.",
    "The cosmic web connects all things in sacred resonance.",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pool_refs(items: &[(&str, usize)]) -> Vec<PoolRef> {
    items
        .iter()
        .map(|(pool, weight)| match *weight {
            1 => PoolRef::Name(pool.to_string()),
            w => PoolRef::Weighted {
                pool: pool.to_string(),
                weight: w,
            },
        })
        .collect()
}

pub fn symbol_pools() -> BTreeMap<String, Vec<String>> {
    SYMBOL_POOLS
        .iter()
        .map(|(name, glyphs)| (name.to_string(), strings(glyphs)))
        .collect()
}

pub fn color_palettes() -> BTreeMap<String, Vec<String>> {
    COLOR_PALETTES
        .iter()
        .map(|(name, colors)| (name.to_string(), strings(colors)))
        .collect()
}

pub fn themes() -> Vec<ThemeConfig> {
    THEMES
        .iter()
        .map(|spec| ThemeConfig {
            name: spec.name.to_string(),
            keywords: strings(spec.keywords),
            symbols: pool_refs(spec.symbols),
            colors: pool_refs(spec.colors),
        })
        .collect()
}

pub fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

pub fn prompts() -> Vec<PromptTemplate> {
    let tagged = |texts: &[&str], themes: &[&str]| -> Vec<PromptTemplate> {
        texts
            .iter()
            .map(|text| PromptTemplate {
                themes: strings(themes),
                text: text.to_string(),
            })
            .collect()
    };

    let mut templates = Vec::new();
    templates.extend(tagged(COSMIC_TEMPLATES, &["cosmic", "wisdom"]));
    templates.extend(tagged(MYSTICAL_TEMPLATES, &["love", "mystery", "peace"]));
    templates.extend(tagged(GEOMETRIC_TEMPLATES, &["quantum"]));
    templates.extend(tagged(ELEMENTAL_TEMPLATES, &["power", "transformation"]));
    // 通用模板：沒有對應主題時使用
    templates.extend(tagged(COSMIC_TEMPLATES, &[]));
    templates.extend(tagged(MYSTICAL_TEMPLATES, &[]));
    templates.extend(tagged(GEOMETRIC_TEMPLATES, &[]));
    templates
}

pub fn phrase_categories() -> Vec<PhraseCategory> {
    PHRASE_CATEGORIES
        .iter()
        .map(|(name, keywords, phrases)| PhraseCategory {
            name: name.to_string(),
            keywords: strings(keywords),
            phrases: strings(phrases),
        })
        .collect()
}

pub fn general_phrases() -> Vec<String> {
    strings(GENERAL_PHRASES)
}

pub fn model_args() -> Vec<String> {
    strings(&["run", "{model}", "{prompt}"])
}
