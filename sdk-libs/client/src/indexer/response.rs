#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    pub slot: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response<T> {
    pub context: Context,
    pub value: T,
}
