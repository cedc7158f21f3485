//! Benchmarks for the render planning pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use postrender::{RenderConfig, RenderOptions, parse_body};

/// A long post: paragraphs, tagged links, and a photo grid per section.
fn sample_body(sections: usize) -> String {
    let mut body = String::new();
    for i in 0..sections {
        body.push_str(&format!(
            r#"<h2>Section {i}</h2>
<p>Posted by <a class="markdown-author-link" data-author="user{i}">@user{i}</a> in
<a class="markdown-tag-link" data-tag="tag{i}">#tag{i}</a>.</p>
<table><tr>
<td><img src="https://images.example.com/{i}/a.jpg"></td>
<td><img src="https://images.example.com/{i}/b.jpg"></td>
</tr></table>
<ul><li><p>point {i}</p></li></ul>
"#
        ));
    }
    body
}

fn bench_parse_body(c: &mut Criterion) {
    let body = sample_body(200);
    c.bench_function("parse_body", |b| {
        b.iter(|| parse_body(&body));
    });
}

fn bench_plan(c: &mut Criterion) {
    let tree = parse_body(&sample_body(200));
    let config = RenderConfig::new(&RenderOptions::default()).unwrap();
    c.bench_function("plan", |b| {
        b.iter(|| config.plan(&tree).unwrap());
    });
}

criterion_group!(benches, bench_parse_body, bench_plan);
criterion_main!(benches);
