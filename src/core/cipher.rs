use rand::Rng;

// ── Rotation cipher ───────────────────────────────────────────────────────────

/// Rotate ASCII letters by `offset`, leaving everything else alone.
/// Strictly a toy; the console's decrypt gag runs on it.
pub fn rot(text: &str, offset: u8) -> String {
    let offset = offset % 26;
    text.chars()
        .map(|c| match c {
            'a'..='z' => (((c as u8 - b'a' + offset) % 26) + b'a') as char,
            'A'..='Z' => (((c as u8 - b'A' + offset) % 26) + b'A') as char,
            _ => c,
        })
        .collect()
}

pub fn rot13(text: &str) -> String {
    rot(text, 13)
}

// ── Brute-force reveal ────────────────────────────────────────────────────────

const GLYPHS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '-', '+', '=', '[', ']', '{', '}',
    '|', ';', ':', '<', '>', '?', '/', '~',
];

/// Reveals a fixed target string one randomly chosen character per tick,
/// showing churning junk glyphs in the unrevealed slots. Reveal order is
/// unspecified; convergence is exact: after `target.len()` ticks the output
/// equals the target and stays there.
pub struct Reveal {
    target: Vec<char>,
    revealed: Vec<bool>,
    ticks: usize,
}

impl Reveal {
    pub fn new(target: &str) -> Self {
        let target: Vec<char> = target.chars().collect();
        let revealed = vec![false; target.len()];
        Self { target, revealed, ticks: 0 }
    }

    /// Lock in one more character. No-op once complete.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        self.ticks += 1;
        let hidden: Vec<usize> = (0..self.target.len())
            .filter(|&i| !self.revealed[i])
            .collect();
        if let Some(&pick) = hidden.get(rng.gen_range(0..hidden.len().max(1))) {
            self.revealed[pick] = true;
        }
    }

    pub fn done(&self) -> bool {
        self.revealed.iter().all(|&r| r)
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// 0..=100
    pub fn progress_pct(&self) -> u8 {
        if self.target.is_empty() {
            return 100;
        }
        let found = self.revealed.iter().filter(|&&r| r).count();
        ((found * 100) / self.target.len()) as u8
    }

    /// Current display string: revealed chars in place, churn elsewhere.
    pub fn frame(&self, rng: &mut impl Rng) -> String {
        self.target
            .iter()
            .zip(&self.revealed)
            .map(|(&c, &r)| if r { c } else { GLYPHS[rng.gen_range(0..GLYPHS.len())] })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn rot_wraps_and_preserves_non_letters() {
        assert_eq!(rot("abc xyz!", 3), "def abc!");
        assert_eq!(rot("HAL 9000", 1), "IBM 9000");
        assert_eq!(rot13(&rot13("hello")), "hello");
    }

    #[test]
    fn rot_offset_reduces_modulo_alphabet() {
        assert_eq!(rot("abc", 26), "abc");
        assert_eq!(rot("abc", 29), rot("abc", 3));
    }

    #[test]
    fn reveal_converges_within_target_length_ticks() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let target = "ACCESS GRANTED";
        let mut rv = Reveal::new(target);
        for _ in 0..target.chars().count() {
            assert!(!rv.done() || rv.progress_pct() == 100);
            rv.tick(&mut rng);
        }
        assert!(rv.done());
        assert_eq!(rv.frame(&mut rng), target);
        assert_eq!(rv.progress_pct(), 100);
    }

    #[test]
    fn fresh_reveal_starts_at_zero_progress() {
        let rv = Reveal::new("SECRET");
        assert_eq!(rv.progress_pct(), 0);
        assert_eq!(rv.ticks(), 0);
        assert!(!rv.done());
    }

    #[test]
    fn empty_target_is_immediately_done() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let mut rv = Reveal::new("");
        assert!(rv.done());
        rv.tick(&mut rng);
        assert!(rv.done());
    }
}
