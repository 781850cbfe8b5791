pub mod region_blurrer;
