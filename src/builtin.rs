/// Built-in vocabulary: the fixed profile compiled into the crate.
///
/// Answers for the default profile identifier whenever no external
/// `default.json` exists. Slot declaration order here is part of the
/// profile's identity: reordering `POOLS` changes every generated prompt.

use indexmap::IndexMap;

use crate::core::profile::{ConfigurationError, ProfileDocument, VocabularyConfiguration};

/// Identifier used in errors raised while building the built-in profile.
pub const BUILTIN_ID: &str = "builtin";

const SUBJECTS: &[&str] = &[
    // People
    "a woman", "a man", "a young woman", "a young man", "an elderly woman",
    "an elderly man", "a child", "a teenager", "a couple", "a group of people",
    // Fantasy Characters
    "a knight", "a wizard", "a witch", "a sorceress", "a necromancer",
    "a paladin", "a rogue", "an assassin", "a ranger", "a barbarian",
    "a druid", "a monk", "a bard", "a warlock", "an elven archer",
    "a dwarven smith", "an orc warrior", "a goblin", "a fairy", "a nymph",
    // Sci-Fi Characters
    "a cyborg", "an android", "a robot", "a mech pilot", "an astronaut",
    "a space marine", "an alien", "a hacker", "a scientist", "a bounty hunter",
    // Historical/Cultural
    "a samurai", "a ninja", "a viking", "a gladiator", "a pharaoh",
    "a geisha", "a shogun", "a roman soldier", "a medieval peasant", "a noble",
    // Modern
    "a detective", "a soldier", "a pilot", "a doctor", "an artist",
    "a musician", "a dancer", "an athlete", "a chef", "a photographer",
    // Creatures
    "a dragon", "a phoenix", "a griffin", "a unicorn", "a werewolf",
    "a vampire", "a demon", "an angel", "a ghost", "a spirit",
    "a wolf", "a lion", "a tiger", "an eagle", "a raven",
    "a serpent", "a whale", "a shark", "a butterfly", "a spider",
    // Constructs
    "a mechanical spider", "a clockwork automaton", "a golem", "a sentient statue",
    "a living shadow", "an elemental being", "a slime creature", "a treant",
];

const ACTIONS: &[&str] = &[
    // Static
    "standing in", "sitting in", "kneeling in", "floating above", "hovering over",
    "resting in", "meditating in", "posing in", "waiting in", "watching over",
    // Movement
    "walking through", "running through", "flying over", "swimming in", "climbing",
    "falling into", "descending into", "ascending toward", "emerging from", "diving into",
    // Combat
    "fighting in", "battling through", "defending", "attacking", "dueling in",
    "charging through", "retreating from", "ambushing in", "hunting in",
    // Discovery
    "exploring", "discovering", "searching through", "investigating",
    "uncovering secrets in", "finding treasure in", "mapping",
    // Interaction
    "summoning power in", "casting a spell in", "channeling energy in",
    "communing with nature in", "praying in", "performing a ritual in",
    "transforming in", "shapeshifting in", "awakening in",
    // Emotional
    "mourning in", "celebrating in", "contemplating in", "dreaming in",
    "remembering in", "lost in thought in",
];

const ENVIRONMENTS: &[&str] = &[
    // Natural
    "a dark forest", "an enchanted forest", "a misty forest", "a bamboo forest",
    "a snowy mountain", "a volcanic mountain", "a floating mountain",
    "a vast desert", "an oasis", "a canyon", "a waterfall", "a river",
    "a beach at sunset", "a stormy sea", "a coral reef", "an underwater cavern",
    // Urban Fantasy
    "a medieval castle", "a ruined fortress", "a gothic cathedral",
    "an ancient temple", "a hidden shrine", "a sacred grove",
    "a wizard's tower", "an alchemist's laboratory", "a royal throne room",
    "a dungeon", "catacombs", "a crypt", "a graveyard at midnight",
    // Sci-Fi
    "a cyberpunk city", "a neon-lit alley", "a futuristic metropolis",
    "a space station", "an alien planet", "a terraformed moon",
    "a dystopian wasteland", "a post-apocalyptic city", "a megastructure",
    "a virtual reality world", "inside a computer mainframe",
    // Mystical
    "a crystal cave", "a bioluminescent cavern", "a floating island",
    "the astral plane", "between dimensions", "the void",
    "a pocket dimension", "a mirror world", "a dream realm",
    // Atmospheric
    "cherry blossom gardens", "an autumn forest", "a field of flowers",
    "under the northern lights", "during a solar eclipse",
    "at the edge of the world", "at the crossroads of fate",
];

const STYLES: &[&str] = &[
    // Realistic
    "photorealistic", "hyperrealistic", "cinematic", "film still",
    "documentary photography", "portrait photography", "fashion photography",
    // Traditional Art
    "oil painting", "watercolor painting", "acrylic painting", "gouache",
    "charcoal drawing", "pencil sketch", "ink drawing", "fresco",
    // Art Movements
    "art nouveau", "art deco", "baroque", "renaissance", "romanticism",
    "impressionist", "expressionist", "surrealist", "cubist",
    "pre-raphaelite", "ukiyo-e", "chinese ink wash",
    // Digital/Modern
    "concept art", "digital painting", "matte painting", "3D render",
    "low poly 3D", "voxel art", "pixel art", "vector art",
    // Animation Styles
    "anime style", "manga style", "studio ghibli style", "disney style",
    "pixar style", "cartoon style", "comic book style", "graphic novel style",
    // Aesthetic
    "vaporwave aesthetic", "synthwave", "cyberpunk aesthetic", "solarpunk",
    "dark academia", "cottagecore", "steampunk", "dieselpunk", "biopunk",
    // Game-Adjacent
    "dark souls style", "elden ring style", "final fantasy style",
    "metal gear style", "borderlands style", "breath of the wild style",
];

const LIGHTING: &[&str] = &[
    // Natural Light
    "golden hour lighting", "blue hour lighting", "harsh midday sun",
    "soft overcast light", "dappled forest light", "sunset backlight",
    "sunrise light", "moonlight", "starlight",
    // Dramatic
    "dramatic rim lighting", "chiaroscuro lighting", "spotlight",
    "harsh shadows", "silhouette lighting", "contre-jour",
    // Artificial
    "neon lighting", "fluorescent lighting", "candlelight", "firelight",
    "bioluminescent glow", "magical glow", "holographic light",
    // Atmospheric
    "volumetric lighting", "god rays", "light shafts", "foggy atmosphere",
    "misty atmosphere", "dusty atmosphere", "rainy atmosphere",
    // Color Temperature
    "warm lighting", "cool lighting", "neutral lighting",
    "high contrast", "low key lighting", "high key lighting",
];

const CAMERA: &[&str] = &[
    // Distance
    "extreme close-up", "close-up portrait", "medium shot", "full body shot",
    "wide shot", "extreme wide shot", "establishing shot",
    // Angle
    "eye level", "low angle shot", "high angle shot", "bird's eye view",
    "worm's eye view", "dutch angle", "overhead shot",
    // Perspective
    "first person view", "over the shoulder", "point of view shot",
    "three-quarter view", "profile view", "frontal view", "rear view",
    // Technical
    "shallow depth of field", "deep focus", "bokeh background",
    "motion blur", "long exposure", "tilt-shift", "fisheye lens",
    "wide angle lens", "telephoto compression", "macro shot",
];

const DETAILS: &[&str] = &[
    // Quality
    "highly detailed", "intricate details", "fine details", "subtle details",
    "sharp focus", "crystal clear", "pristine quality",
    // Resolution
    "4k", "8k", "high resolution", "ultra HD",
    // Recognition
    "masterpiece", "award winning", "professional", "museum quality",
    "trending on artstation", "featured on behance", "gallery quality",
    // Technical
    "ray tracing", "global illumination", "subsurface scattering",
    "ambient occlusion", "realistic textures", "photogrammetry",
    // Artistic
    "expressive brushwork", "visible brushstrokes", "smooth gradients",
    "rich colors", "vibrant palette", "muted tones", "monochromatic",
];

const MOOD: &[&str] = &[
    // Positive
    "serene", "peaceful", "tranquil", "joyful", "euphoric",
    "whimsical", "playful", "romantic", "hopeful", "triumphant",
    // Negative
    "ominous", "foreboding", "melancholic", "sorrowful", "tragic",
    "terrifying", "horrific", "unsettling", "disturbing",
    // Neutral/Complex
    "mysterious", "enigmatic", "surreal", "dreamlike", "ethereal",
    "nostalgic", "bittersweet", "contemplative", "introspective",
    // Intensity
    "tense", "intense", "chaotic", "explosive", "dynamic",
    "calm", "still", "quiet", "subtle", "understated",
    // Atmosphere
    "epic", "grand", "intimate", "cozy", "lonely", "isolated",
    "crowded", "bustling", "abandoned", "timeless",
];

const TEMPLATES: &[&str] = &[
    "{subject} {action} {environment}, {style}, {lighting}, {camera}, {details}, {mood} atmosphere",
    "{camera} of {subject} {action} {environment}, {style}, {lighting}, {details}, {mood}",
    "{style} {subject}, {environment}, {lighting}, {mood} mood, {details}",
    "{subject} in {environment}, {mood} {style}, {lighting}, {camera}, {details}",
    "{mood} scene of {subject} {action} {environment}, {style}, {lighting}, {details}",
    "{style} depicting {subject}, {environment} setting, {lighting}, {camera}",
    "{camera}, {subject} {action} {environment}, {style}, {mood}, {details}",
    "{subject}, {environment}, {style}, {lighting}, {mood} atmosphere, {details}",
];

/// Slot name to pool, in declaration order.
const POOLS: &[(&str, &[&str])] = &[
    ("subject", SUBJECTS),
    ("action", ACTIONS),
    ("environment", ENVIRONMENTS),
    ("style", STYLES),
    ("lighting", LIGHTING),
    ("camera", CAMERA),
    ("details", DETAILS),
    ("mood", MOOD),
];

/// The built-in profile in its source-document shape.
pub fn document() -> ProfileDocument {
    let pools: IndexMap<String, Vec<String>> = POOLS
        .iter()
        .map(|(slot, items)| {
            (
                slot.to_string(),
                items.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect();

    ProfileDocument {
        name: Some("Zero Prompt Built-in".to_string()),
        description: Some(
            "General-purpose image prompts: subjects, actions, environments, styles, lighting, camera, details and mood."
                .to_string(),
        ),
        version: Some("1.0".to_string()),
        templates: Some(TEMPLATES.iter().map(|s| s.to_string()).collect()),
        pools: Some(pools),
    }
}

/// Build the validated built-in vocabulary.
pub fn vocabulary() -> Result<VocabularyConfiguration, ConfigurationError> {
    VocabularyConfiguration::from_document(BUILTIN_ID, document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::total_combinations;

    #[test]
    fn builtin_validates() {
        let vocab = vocabulary().unwrap();
        assert_eq!(vocab.templates().len(), 8);
        assert_eq!(vocab.pool_count(), 8);
    }

    #[test]
    fn slot_order_is_declaration_order() {
        let vocab = vocabulary().unwrap();
        let slots: Vec<&str> = vocab.slots().collect();
        assert_eq!(
            slots,
            vec![
                "subject",
                "action",
                "environment",
                "style",
                "lighting",
                "camera",
                "details",
                "mood"
            ]
        );
    }

    #[test]
    fn pool_sizes() {
        let vocab = vocabulary().unwrap();
        let sizes: Vec<usize> = vocab.pools().map(|(_, items)| items.len()).collect();
        assert_eq!(sizes, vec![88, 51, 56, 58, 35, 31, 31, 48]);
        assert_eq!(
            total_combinations(&vocab).to_string(),
            "188274509660160"
        );
    }

    #[test]
    fn every_template_resolves() {
        let vocab = vocabulary().unwrap();
        assert!(vocab.unresolved_placeholders().is_empty());
        assert!(vocab.unused_slots().is_empty());
    }
}
