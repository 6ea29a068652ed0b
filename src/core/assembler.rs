/// Prompt assembly: seed + index + vocabulary → prompt text.
///
/// Template choice hashes coordinate `(index, 0)`; the slot declared at
/// position `p` hashes `(index, p + 1)`. Every selection therefore draws
/// from its own coordinate tuple and none depends on another's digest.

use crate::core::hash::{coordinate_hash, to_index};
use crate::core::profile::VocabularyConfiguration;
use crate::core::template::{render, Piece, Template};

/// Coordinate reserved for template selection.
pub const TEMPLATE_COORDINATE: i32 = 0;

/// Text placed verbatim around an assembled prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affixes<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
}

impl<'a> Affixes<'a> {
    pub fn new(prefix: &'a str, suffix: &'a str) -> Self {
        Self { prefix, suffix }
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }

    pub fn apply(&self, text: String) -> String {
        if self.is_empty() {
            return text;
        }
        let mut out = String::with_capacity(self.prefix.len() + text.len() + self.suffix.len());
        out.push_str(self.prefix);
        out.push_str(&text);
        out.push_str(self.suffix);
        out
    }
}

/// The value picked for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotChoice<'a> {
    pub slot: &'a str,
    /// Index into the slot's pool.
    pub index: usize,
    pub value: &'a str,
}

/// Every selection made for one (seed, index) pair, before substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    pub template_index: usize,
    pub template: &'a Template,
    /// One entry per slot, in declaration order.
    pub slots: Vec<SlotChoice<'a>>,
}

impl<'a> Selection<'a> {
    /// Resolve the chosen template against the chosen slot values.
    pub fn pieces(&self, config: &VocabularyConfiguration) -> Vec<Piece<'a>> {
        self.template.resolve(|name| {
            config
                .slot_position(name)
                .and_then(|pos| self.slots.get(pos))
                .map(|choice| choice.value)
        })
    }

    pub fn render(&self, config: &VocabularyConfiguration) -> String {
        render(&self.pieces(config))
    }
}

/// Coordinate for the slot declared at `position`.
#[inline]
pub fn slot_coordinate(position: usize) -> i32 {
    position as i32 + 1
}

/// Reinterpret a prompt index as a hashing coordinate, bit for bit.
#[inline]
fn index_coordinate(index: u32) -> i32 {
    index as i32
}

/// Make every selection for `(seed, index)` without rendering.
pub fn select(seed: u32, index: u32, config: &VocabularyConfiguration) -> Selection<'_> {
    let coord = index_coordinate(index);

    let templates = config.templates();
    let template_hash = coordinate_hash(seed, &[coord, TEMPLATE_COORDINATE]);
    let template_index = to_index(template_hash, templates.len());

    let slots = config
        .pools()
        .enumerate()
        .map(|(position, (slot, pool))| {
            let slot_hash = coordinate_hash(seed, &[coord, slot_coordinate(position)]);
            let pick = to_index(slot_hash, pool.len());
            SlotChoice {
                slot,
                index: pick,
                value: pool[pick].as_str(),
            }
        })
        .collect();

    Selection {
        template_index,
        template: &templates[template_index],
        slots,
    }
}

/// Assemble the prompt at `(seed, index)`.
///
/// Never fails: placeholders naming undeclared slots render as `[slot]`.
pub fn generate(seed: u32, index: u32, config: &VocabularyConfiguration) -> String {
    select(seed, index, config).render(config)
}

/// Assemble the prompt at `(seed, index)` wrapped in `affixes`.
pub fn generate_with_affixes(
    seed: u32,
    index: u32,
    config: &VocabularyConfiguration,
    affixes: Affixes<'_>,
) -> String {
    affixes.apply(generate(seed, index, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> VocabularyConfiguration {
        VocabularyConfiguration::parse_json(
            "small.json",
            r#"{
                "templates": ["{color} {animal}", "a {animal} that is {color}"],
                "pools": {
                    "color": ["red", "green", "blue"],
                    "animal": ["cat", "dog", "owl", "eel"]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn selection_uses_disjoint_coordinates() {
        let config = small();
        let sel = select(42, 0, &config);

        let t = coordinate_hash(42, &[0, 0]);
        assert_eq!(sel.template_index, to_index(t, 2));

        let color = coordinate_hash(42, &[0, 1]);
        let animal = coordinate_hash(42, &[0, 2]);
        assert_eq!(sel.slots[0].slot, "color");
        assert_eq!(sel.slots[0].index, to_index(color, 3));
        assert_eq!(sel.slots[1].slot, "animal");
        assert_eq!(sel.slots[1].index, to_index(animal, 4));
    }

    #[test]
    fn adding_a_slot_leaves_earlier_choices_alone() {
        let config = small();
        let extended = VocabularyConfiguration::parse_json(
            "extended.json",
            r#"{
                "templates": ["{color} {animal}", "a {animal} that is {color}"],
                "pools": {
                    "color": ["red", "green", "blue"],
                    "animal": ["cat", "dog", "owl", "eel"],
                    "time": ["dawn", "dusk"]
                }
            }"#,
        )
        .unwrap();

        for index in 0..200 {
            let a = select(9, index, &config);
            let b = select(9, index, &extended);
            assert_eq!(a.template_index, b.template_index);
            assert_eq!(a.slots[..], b.slots[..2]);
        }
    }

    #[test]
    fn generate_is_deterministic() {
        let config = small();
        for index in 0..100 {
            assert_eq!(generate(7, index, &config), generate(7, index, &config));
        }
    }

    #[test]
    fn output_is_a_filled_template() {
        let config = small();
        for index in 0..100 {
            let sel = select(3, index, &config);
            let color = sel.slots[0].value;
            let animal = sel.slots[1].value;
            let expected = if sel.template_index == 0 {
                format!("{color} {animal}")
            } else {
                format!("a {animal} that is {color}")
            };
            assert_eq!(generate(3, index, &config), expected);
        }
    }

    #[test]
    fn unknown_slot_degrades_to_marker() {
        let config = VocabularyConfiguration::parse_json(
            "gap.json",
            r#"{"templates": ["{color} sky over {horizon}"], "pools": {"color": ["grey"]}}"#,
        )
        .unwrap();
        assert_eq!(generate(1, 1, &config), "grey sky over [horizon]");
    }

    #[test]
    fn high_indices_are_valid_coordinates() {
        let config = small();
        let text = generate(u32::MAX, u32::MAX, &config);
        assert!(!text.is_empty());
        assert_eq!(index_coordinate(u32::MAX), -1);
    }

    #[test]
    fn affixes_are_verbatim() {
        let config = small();
        let bare = generate(5, 5, &config);
        let wrapped = generate_with_affixes(5, 5, &config, Affixes::new("masterpiece, ", "!"));
        assert_eq!(wrapped, format!("masterpiece, {bare}!"));

        let plain = generate_with_affixes(5, 5, &config, Affixes::default());
        assert_eq!(plain, bare);
    }
}
