
mod copy_ops;
mod lookup_read;
mod metadata_ops;
mod os_flavors;
mod rename_ops;
mod symlink_ops;
