//! Presentation schemes: the motion vocabulary a page is rendered with.
//!
//! Templates reference four abstract tokens (`anim_hero`, `anim_section`,
//! `anim_card`, `anim_cta`). A scheme maps each to a CSS class and ships the
//! keyframes those classes need.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationScheme {
    pub name: &'static str,
    pub hero: &'static str,
    pub section: &'static str,
    pub card: &'static str,
    pub cta: &'static str,
    /// Class and keyframe definitions for the identifiers above.
    pub css: &'static str,
}

/// Animation tokens every scheme defines.
pub const ANIMATION_TOKENS: &[&str] = &["anim_hero", "anim_section", "anim_card", "anim_cta"];

pub const SCHEMES: &[PresentationScheme] = &[
    PresentationScheme {
        name: "fade",
        hero: "sg-fade-in",
        section: "sg-fade-in-slow",
        card: "sg-fade-in",
        cta: "sg-fade-in-late",
        css: r#"@keyframes sg-fade { from { opacity: 0; } to { opacity: 1; } }
.sg-fade-in { animation: sg-fade 0.8s ease-out both; }
.sg-fade-in-slow { animation: sg-fade 1.4s ease-out both; }
.sg-fade-in-late { animation: sg-fade 0.8s ease-out 0.6s both; }
"#,
    },
    PresentationScheme {
        name: "slide",
        hero: "sg-slide-left",
        section: "sg-slide-up",
        card: "sg-slide-up",
        cta: "sg-slide-right",
        css: r#"@keyframes sg-slide-x { from { opacity: 0; transform: translateX(-40px); } to { opacity: 1; transform: none; } }
@keyframes sg-slide-x-rev { from { opacity: 0; transform: translateX(40px); } to { opacity: 1; transform: none; } }
@keyframes sg-slide-y { from { opacity: 0; transform: translateY(30px); } to { opacity: 1; transform: none; } }
.sg-slide-left { animation: sg-slide-x 0.7s ease-out both; }
.sg-slide-right { animation: sg-slide-x-rev 0.7s ease-out 0.3s both; }
.sg-slide-up { animation: sg-slide-y 0.7s ease-out both; }
"#,
    },
    PresentationScheme {
        name: "zoom",
        hero: "sg-zoom-in",
        section: "sg-fade-up",
        card: "sg-zoom-soft",
        cta: "sg-pulse",
        css: r#"@keyframes sg-zoom { from { opacity: 0; transform: scale(0.9); } to { opacity: 1; transform: none; } }
@keyframes sg-fade-up { from { opacity: 0; transform: translateY(12px); } to { opacity: 1; transform: none; } }
@keyframes sg-pulse { 0%, 100% { transform: scale(1); } 50% { transform: scale(1.05); } }
.sg-zoom-in { animation: sg-zoom 0.8s ease-out both; }
.sg-zoom-soft { animation: sg-zoom 1.1s ease-out both; }
.sg-fade-up { animation: sg-fade-up 0.9s ease-out both; }
.sg-pulse { animation: sg-pulse 2.4s ease-in-out 1s infinite; }
"#,
    },
    PresentationScheme {
        name: "float",
        hero: "sg-float-in",
        section: "sg-rise",
        card: "sg-hover-lift",
        cta: "sg-bob",
        css: r#"@keyframes sg-float-in { from { opacity: 0; transform: translateY(-20px); } to { opacity: 1; transform: none; } }
@keyframes sg-rise { from { opacity: 0; transform: translateY(40px); } to { opacity: 1; transform: none; } }
@keyframes sg-bob { 0%, 100% { transform: translateY(0); } 50% { transform: translateY(-4px); } }
.sg-float-in { animation: sg-float-in 1s ease-out both; }
.sg-rise { animation: sg-rise 1s ease-out both; }
.sg-hover-lift { transition: transform 0.3s ease, box-shadow 0.3s ease; }
.sg-hover-lift:hover { transform: translateY(-6px); box-shadow: 0 12px 24px rgba(0, 0, 0, 0.12); }
.sg-bob { animation: sg-bob 3s ease-in-out infinite; }
"#,
    },
];

impl PresentationScheme {
    /// Pick one scheme uniformly at random.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> &'static PresentationScheme {
        &SCHEMES[rng.gen_range(0..SCHEMES.len())]
    }

    pub fn by_name(name: &str) -> Option<&'static PresentationScheme> {
        SCHEMES.iter().find(|s| s.name == name)
    }

    /// `(token, class)` pairs for substitution.
    pub fn bindings(&self) -> [(&'static str, &'static str); 4] {
        [
            ("anim_hero", self.hero),
            ("anim_section", self.section),
            ("anim_card", self.card),
            ("anim_cta", self.cta),
        ]
    }
}
