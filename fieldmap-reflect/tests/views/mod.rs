mod enums;
mod generic;
