pub mod formatter;
pub mod protocol;

pub mod intent {
    pub mod matcher;
    pub mod patterns;
}
