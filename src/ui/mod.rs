pub mod axis;
pub mod canvas;
pub mod histogram;
pub mod panels;
pub mod parallel;
pub mod scatter;
