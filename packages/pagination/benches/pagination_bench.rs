use constitution_model::{Section, SectionId, SectionType};
use constitution_pagination::{build_toc, group_into_pages, PaginationConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn large_constitution() -> Vec<Section> {
    let mut sections = vec![Section::new("preamble", SectionType::Preamble, 0.0, None)
        .with_content("We the members ".repeat(40))];

    for a in 0..30 {
        let article = format!("article-{}", a);
        sections.push(Section::new(article.as_str(), SectionType::Article, a as f64, None));
        for s in 0..10 {
            let section = format!("{}-section-{}", article, s);
            sections.push(
                Section::new(
                    section.as_str(),
                    SectionType::Section,
                    s as f64,
                    Some(SectionId::new(article.clone())),
                )
                .with_content("Body text ".repeat(60)),
            );
            for x in 0..3 {
                sections.push(Section::new(
                    format!("{}-sub-{}", section, x),
                    SectionType::Subsection,
                    x as f64,
                    Some(SectionId::new(section.clone())),
                ));
            }
        }
    }

    sections
}

fn paginate_large_constitution(c: &mut Criterion) {
    let sections = large_constitution();

    c.bench_function("group_into_pages", |b| {
        b.iter(|| group_into_pages(black_box(&sections)).len())
    });
}

fn toc_large_constitution(c: &mut Criterion) {
    let sections = large_constitution();
    let config = PaginationConfig::default();

    c.bench_function("build_toc", |b| {
        b.iter(|| build_toc(black_box(&sections), &config).map(|toc| toc.len()))
    });
}

criterion_group!(benches, paginate_large_constitution, toc_large_constitution);
criterion_main!(benches);
