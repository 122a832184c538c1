mod f_bearer;

pub(crate) use f_bearer::try_bearer;
