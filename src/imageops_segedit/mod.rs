pub mod class_mask;
pub mod inpaint;
pub mod labels;
pub mod mask_compositor;
pub mod session;
