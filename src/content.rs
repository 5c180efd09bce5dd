// ── Portfolio copy ────────────────────────────────────────────────────────────
// All static, compiled in. Swap these consts to rebrand the deck.

pub const HANDLE: &str = "V0IDRUNNER";

pub const HERO: &[&str] = &[
    r"__     ______ ___ ____  ____  _   _ _   _ _   _ _____ ____  ",
    r"\ \   / / _ \_ _|  _ \|  _ \| | | | \ | | \ | | ____|  _ \ ",
    r" \ \ / / | | | || | | | |_) | | | |  \| |  \| |  _| | |_) |",
    r"  \ V /| |_| | || |_| |  _ <| |_| | |\  | |\  | |___|  _ < ",
    r"   \_/  \___/___|____/|_| \_\\___/|_| \_|_| \_|_____|_| \_\",
];

pub const TAGLINE: &str = "systems developer // terminal enthusiast // night shift";

pub const WHOAMI: &[&str] = &[
    "handle:   V0IDRUNNER",
    "meat:     systems developer, ten years on the wire",
    "stack:    kernels, compilers, anything with a scheduler",
    "location: somewhere below the cloud layer",
    "status:   jacked in",
];

pub const SKILLS: &[&str] = &[
    "[##########] systems programming",
    "[#########.] network plumbing",
    "[########..] compiler internals",
    "[#######...] embedded targets",
    "[######....] forgetting semicolons",
];

pub const CONTACT: &[&str] = &[
    "mail:   v0id@dead.drop",
    "git:    github.com/nullpointer-dev",
    "matrix: @v0idrunner:syn.net",
    "pgp:    0xDEADC0DE (ask)",
];

/// Home-screen sections the minimap jumps between.
pub const SECTIONS: &[(&str, &str)] = &[
    ("hero", "// IDENT"),
    ("bio", "// DOSSIER"),
    ("skills", "// LOADOUT"),
    ("contact", "// UPLINK"),
];

pub const BIO: &[&str] = &[
    "Ten years of writing software that talks to hardware, schedulers,",
    "and other software that should have known better. I like small",
    "binaries, honest error messages, and interfaces that fit in a",
    "terminal. This deck is my card: poke around, press keys, break",
    "things. Everything resets.",
];

/// Targets the brute-force cracker converges on.
pub const CRACK_TARGETS: &[&str] = &[
    "ACCESS GRANTED // WELCOME OPERATOR",
    "MAINFRAME BREACHED // TAKE NOTHING",
    "ICE MELTED // DOOR IS OPEN",
];

/// Ids the hidden-node scan can discover. All of them found unlocks
/// the secret_hunter achievement.
pub const SECRET_NODES: &[(&str, &str)] = &[
    ("node_basement", "basement relay behind the boiler"),
    ("node_rooftop", "rooftop dish, northeast corner"),
    ("node_subnet", "orphaned subnet 10.66.6.0/24"),
    ("node_payphone", "the last payphone downtown"),
    ("node_fridge", "someone's smart fridge"),
];

pub const HELP_LINES: &[&str] = &[
    "KEYBINDS",
    "",
    "  `        console",
    "  ?        this help",
    "  m        minimap",
    "  r        digital rain",
    "  g        hidden-node scan",
    "  f        performance readout",
    "  b        brute-force cracker",
    "  ctrl+k   command palette",
    "  esc      close the focused panel",
    "  j / k    scroll the dossier",
    "  q        jack out",
    "",
    "Everything here is a toy. The console knows more: try `help` there.",
];
