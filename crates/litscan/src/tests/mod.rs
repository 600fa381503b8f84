mod property_scan;
