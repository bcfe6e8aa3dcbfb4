//! Curated word lists shared by the bundled strategies

/// Short brandable prefixes (getX, myX, goX)
pub const PREFIXES: &[&str] = &[
    "go", "my", "get", "try", "the", "use", "hey", "we", "up", "on",
    "be", "do", "hi", "so", "re", "co", "un", "i", "e", "x",
];

/// Short brandable suffixes (Xly, Xify, Xhq)
pub const SUFFIXES: &[&str] = &[
    "ly", "fy", "io", "hq", "hub", "lab", "app", "ify", "now", "kit",
    "zone", "base", "labs", "works", "ai", "go", "up", "er", "ist", "spot",
];

/// Evocative words for pairing with the base name
pub const WORDS: &[&str] = &[
    // Tech & Startup
    "cloud", "pixel", "spark", "flash", "boost", "prime", "nexus", "swift",
    "stack", "scale", "pulse", "forge", "craft", "logic", "radar",
    // Nature
    "bloom", "river", "storm", "stone", "ember", "coral", "maple", "cedar",
    // Motion & Abstract
    "orbit", "drift", "glide", "flow", "wave", "echo", "flux", "vibe",
    // Positive
    "vivid", "quest", "bright", "happy", "lucky", "brave", "noble", "grand",
];
