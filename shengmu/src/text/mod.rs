pub mod align;
pub mod frontend;
pub mod g2p;
pub mod normalize;
pub mod segmentation;
pub mod symbols;
