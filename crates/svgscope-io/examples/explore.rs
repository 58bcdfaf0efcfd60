//! Walk through a small scene: import, address nodes by identifier, mutate
//! appearance and transform, then print the resulting display list as JSON.
//!
//! Run with `RUST_LOG=debug cargo run --example explore` to watch the
//! promotion machinery.

use svgscope_core::{Color, Paint, SceneTree};
use svgscope_io::read_svg_str;
use svgscope_render::{render, DisplayList};

const SCENE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="120">
  <g id="layer">
    <rect id="sky" x="0" y="0" width="120" height="60" fill="#87ceeb"/>
    <circle id="sun" cx="90" cy="20" r="12" fill="yellow"/>
    <polygon id="roof" points="20,60 60,30 100,60" fill="#8b0000"/>
  </g>
</svg>"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let document = read_svg_str(SCENE)?;
    let mut tree = SceneTree::build(document)?;

    // Address by identifier, from anywhere in the tree.
    let sun = tree.lookup("sun")?;
    let roof = tree.lookup("roof")?;

    // Appearance edits hit the primitive in place.
    tree.look(roof).set_fill(Paint::solid(Color::rgb(200, 40, 40)));

    // Transform access promotes the sun into its own view and binds
    // independent components to it.
    {
        let mut t = tree.transform(sun)?;
        t.set_scale(1.5, 1.5);
        t.set_rotation_deg(15.0);
        println!("sun pivot: {:?}", t.pivot());
    }

    // Hide the sky and render what remains.
    let sky = tree.lookup("sky")?;
    tree.look(sky).set_visible(false);

    let mut frame = DisplayList::new();
    render(&tree, &mut frame);
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}
