pub mod http_object_store;
