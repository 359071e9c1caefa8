//! EFF wordlist module (placeholder — no content referenced elsewhere in the crate)
