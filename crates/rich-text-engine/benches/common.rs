use rich_text_engine::model::{Block, BlockType, Document, Inline, Leaf, Mark, Text};

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_document(sections: usize) -> Document {
    let mut blocks = Vec::with_capacity(sections * 3);
    for section in 0..sections {
        blocks.push(Block::new(
            BlockType::HeadingTwo,
            vec![Text::plain(format!("Section {section}")).into()],
        ));
        blocks.push(Block::new(
            BlockType::Paragraph,
            vec![
                Text::new(vec![
                    Leaf::plain("Paragraph with "),
                    Leaf::new("bold", [Mark::Bold].into_iter().collect()),
                    Leaf::plain(" and an emoji "),
                ])
                .into(),
                Inline::emoji("😃").into(),
                Text::plain(" after it.").into(),
            ],
        ));
        blocks.push(generate_list(BlockType::BulletedList, 3));
    }
    Document::new(blocks)
}

#[allow(dead_code)]
pub fn generate_list(kind: BlockType, items: usize) -> Block {
    Block::new(
        kind,
        (0..items)
            .map(|i| {
                Block::new(
                    BlockType::ListItem,
                    vec![Text::plain(format!("Item {i}")).into()],
                )
                .into()
            })
            .collect(),
    )
}
