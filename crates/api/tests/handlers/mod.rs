mod router_test;
mod waitlist_test;
