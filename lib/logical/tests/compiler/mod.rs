mod element;
mod query;
mod test_utils;
