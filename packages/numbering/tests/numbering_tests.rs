//! Numbering scenarios over whole documents

use constitution_model::{Section, SectionId, SectionType};
use constitution_numbering::{display_title, indent_level, number_label, sibling_rank, Numberer};

fn section(id: &str, ty: SectionType, order: f64, parent: Option<&str>, title: &str) -> Section {
    Section::new(id, ty, order, parent.map(SectionId::from)).with_title(title)
}

#[test]
fn test_building_a_constitution_step_by_step() {
    let mut sections = vec![
        section("a", SectionType::Article, 1.0, None, "Name"),
        section("b", SectionType::Article, 2.0, None, "Purpose"),
    ];
    assert_eq!(display_title(&sections[0], &sections).unwrap(), "Article I - Name");
    assert_eq!(display_title(&sections[1], &sections).unwrap(), "Article II - Purpose");

    sections.push(section("s", SectionType::Section, 1.0, Some("a"), "Official Name"));
    assert_eq!(display_title(&sections[2], &sections).unwrap(), "Section 1 - Official Name");

    sections.push(section("ss", SectionType::Subsection, 1.0, Some("s"), "Abbreviation"));
    assert_eq!(
        display_title(&sections[3], &sections).unwrap(),
        "Subsection 1.1 - Abbreviation"
    );

    sections.push(section("sss", SectionType::Subsection, 1.0, Some("ss"), "Usage"));
    assert_eq!(
        display_title(&sections[4], &sections).unwrap(),
        "Subsection 1.1A - Usage"
    );

    assert_eq!(indent_level(&sections[0], &sections).unwrap(), 0);
    assert_eq!(indent_level(&sections[2], &sections).unwrap(), 1);
    assert_eq!(indent_level(&sections[3], &sections).unwrap(), 2);
    assert_eq!(indent_level(&sections[4], &sections).unwrap(), 3);
}

#[test]
fn test_ranks_have_no_gaps_for_sparse_orders() {
    let orders = [7.5, -2.0, 100.0, 3.0, 3.25];
    let mut sections = vec![section("art", SectionType::Article, 1.0, None, "Rules")];
    for (i, order) in orders.iter().enumerate() {
        sections.push(section(
            &format!("s{}", i),
            SectionType::Section,
            *order,
            Some("art"),
            "Rule",
        ));
    }

    let numberer = Numberer::new(&sections);
    let mut by_order: Vec<&Section> = sections[1..].iter().collect();
    by_order.sort_by(|a, b| a.order.total_cmp(&b.order));

    let ranks: Vec<usize> = by_order.iter().map(|s| numberer.rank(s).unwrap()).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_ties_numbered_in_input_order() {
    let sections = vec![
        section("first", SectionType::Amendment, 1.0, None, "One"),
        section("second", SectionType::Amendment, 1.0, None, "Two"),
    ];
    assert_eq!(display_title(&sections[0], &sections).unwrap(), "Amendment 1 - One");
    assert_eq!(display_title(&sections[1], &sections).unwrap(), "Amendment 2 - Two");
}

#[test]
fn test_preamble_title_is_literal() {
    let sections = vec![section("p", SectionType::Preamble, 1.0, None, "We the members")];
    assert_eq!(display_title(&sections[0], &sections).unwrap(), "Preamble");
}

#[test]
fn test_section_numbering_survives_deleted_article() {
    // Non-cascading delete leaves the section pointing at nothing
    let sections = vec![
        section("s1", SectionType::Section, 1.0, Some("deleted"), "Left behind"),
        section("s2", SectionType::Section, 2.0, Some("deleted"), "Also left"),
    ];
    assert_eq!(display_title(&sections[1], &sections).unwrap(), "Section 2 - Also left");
}

#[test]
fn test_number_labels_and_ranks() {
    let sections = vec![
        section("a1", SectionType::Article, 1.0, None, "One"),
        section("a2", SectionType::Article, 2.0, None, "Two"),
        section("s1", SectionType::Section, 1.0, Some("a2"), "First"),
        section("s2", SectionType::Section, 2.0, Some("a2"), "Second"),
        section("ss", SectionType::Subsection, 1.0, Some("s2"), "Deep"),
        section("sss", SectionType::Subsection, 1.0, Some("ss"), "Deeper"),
        section("ssss", SectionType::Subsection, 2.0, Some("ss"), "Deepest"),
    ];

    assert_eq!(sibling_rank(&sections[1], &sections), Some(2));
    assert_eq!(sibling_rank(&sections[3], &sections), Some(2));
    assert_eq!(number_label(&sections[1], &sections).unwrap().as_deref(), Some("II"));
    assert_eq!(number_label(&sections[6], &sections).unwrap().as_deref(), Some("2.1B"));
}
